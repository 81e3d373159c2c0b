//! Lexicon: user/project/global overrides for pronunciation readings

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LexiconPriority {
    // Ord derive makes Global < Project < User; we want User to win, so
    // compare with `.max()` / sort descending when picking a hit.
    Global,
    Project,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub term: String,
    pub reading: String,
    #[serde(default)]
    pub variants: Vec<String>,
    pub category: String,
    pub priority: LexiconPriority,
    pub phoneme: Option<String>,
}

/// Case-insensitive layered lexicon. A lookup on a variant resolves to the
/// main term's reading; the highest-priority tier wins on a collision.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
    /// lowercased lookup key (term or variant) -> index into `entries`
    index: HashMap<String, Vec<usize>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<LexiconEntry>) -> Self {
        let mut lex = Self::new();
        for entry in entries {
            lex.insert(entry);
        }
        lex
    }

    pub fn insert(&mut self, entry: LexiconEntry) {
        let idx = self.entries.len();
        let mut keys = vec![entry.term.to_lowercase()];
        keys.extend(entry.variants.iter().map(|v| v.to_lowercase()));
        for key in keys {
            self.index.entry(key).or_default().push(idx);
        }
        self.entries.push(entry);
    }

    /// Look up a token case-insensitively. Ties broken by priority:
    /// user > project > global.
    pub fn lookup(&self, token: &str) -> Option<&LexiconEntry> {
        let key = token.to_lowercase();
        let candidates = self.index.get(&key)?;
        candidates
            .iter()
            .map(|&i| &self.entries[i])
            .max_by_key(|e| e.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(term: &str, reading: &str, priority: LexiconPriority) -> LexiconEntry {
        LexiconEntry {
            term: term.into(),
            reading: reading.into(),
            variants: vec![],
            category: "brand".into(),
            priority,
            phoneme: None,
        }
    }

    #[test]
    fn user_entry_shadows_global_on_collision() {
        let mut lex = Lexicon::new();
        lex.insert(entry("API", "에이피아이(글로벌)", LexiconPriority::Global));
        lex.insert(entry("API", "에이피아이(유저)", LexiconPriority::User));

        let hit = lex.lookup("api").unwrap();
        assert_eq!(hit.reading, "에이피아이(유저)");
    }

    #[test]
    fn variants_fall_back_to_main_term_reading() {
        let mut lex = Lexicon::new();
        let mut e = entry("ChatGPT", "챗지피티", LexiconPriority::Project);
        e.variants = vec!["GPT".into()];
        lex.insert(e);

        assert_eq!(lex.lookup("gpt").unwrap().reading, "챗지피티");
    }

    #[test]
    fn unknown_token_returns_none() {
        let lex = Lexicon::new();
        assert!(lex.lookup("unknown").is_none());
    }
}
