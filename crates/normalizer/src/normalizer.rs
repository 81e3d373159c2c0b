//! The normalization engine
//!
//! Applies the lexicon (priority 100, handled separately since it needs
//! [`Lexicon`] access) and then every rule in [`crate::rules::RULES`] in
//! descending-priority order, recording a [`podcast_core::NormalizationWarning`]
//! for any leftover Latin-script token nothing matched.

use crate::lexicon::Lexicon;
use crate::rules::{NormalizationRule, RULES};
use once_cell::sync::Lazy;
use podcast_core::{NormalizationLogEntry, NormalizationWarning};
use regex::Regex;

static LEXICON_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9]*|[\p{Hangul}]+").unwrap());
static OOV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]{2,}").unwrap());

pub struct NormalizationOutcome {
    pub normalized_text: String,
    pub log: Vec<NormalizationLogEntry>,
    pub warnings: Vec<NormalizationWarning>,
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    lexicon: Lexicon,
}

impl Normalizer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Normalize a single turn's raw text into TTS-safe text, idempotently:
    /// `normalize(normalize(x).normalized_text) == normalize(x)` for any x
    /// that does not contain further lexicon/rule targets after one pass.
    pub fn normalize(&self, turn_id: &str, text: &str) -> NormalizationOutcome {
        if text.is_empty() {
            return NormalizationOutcome {
                normalized_text: String::new(),
                log: Vec::new(),
                warnings: Vec::new(),
            };
        }

        let mut log = Vec::new();
        let mut current = self.apply_lexicon(text, &mut log);
        for rule in RULES.iter() {
            current = apply_rule(rule, &current, &mut log);
        }
        let normalized_text = collapse_and_trim(&current);
        let warnings = self.collect_oov_warnings(turn_id, &normalized_text);

        NormalizationOutcome { normalized_text, log, warnings }
    }

    fn apply_lexicon(&self, text: &str, log: &mut Vec<NormalizationLogEntry>) -> String {
        let mut result = String::with_capacity(text.len());
        let mut last_end = 0;
        for m in LEXICON_TOKEN_RE.find_iter(text) {
            if let Some(entry) = self.lexicon.lookup(m.as_str()) {
                result.push_str(&text[last_end..m.start()]);
                log.push(NormalizationLogEntry {
                    original: m.as_str().to_string(),
                    normalized: entry.reading.clone(),
                    rule: "lexicon_lookup".to_string(),
                    start: m.start(),
                    end: m.end(),
                });
                result.push_str(&entry.reading);
                last_end = m.end();
            }
        }
        result.push_str(&text[last_end..]);
        result
    }

    fn collect_oov_warnings(&self, turn_id: &str, text: &str) -> Vec<NormalizationWarning> {
        OOV_RE
            .find_iter(text)
            .map(|m| NormalizationWarning {
                turn_id: turn_id.to_string(),
                token: m.as_str().to_string(),
                reason: "no lexicon entry or normalization rule matched".to_string(),
            })
            .collect()
    }
}

fn apply_rule(rule: &NormalizationRule, text: &str, log: &mut Vec<NormalizationLogEntry>) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;
    for caps in rule.pattern.captures_iter(text) {
        let m = caps.get(0).unwrap();
        if m.start() < last_end {
            continue;
        }
        result.push_str(&text[last_end..m.start()]);
        let replacement = (rule.handler)(&caps);
        log.push(NormalizationLogEntry {
            original: m.as_str().to_string(),
            normalized: replacement.clone(),
            rule: rule.id.to_string(),
            start: m.start(),
            end: m.end(),
        });
        result.push_str(&replacement);
        last_end = m.end();
    }
    result.push_str(&text[last_end..]);
    result
}

fn collapse_and_trim(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{LexiconEntry, LexiconPriority};

    #[test]
    fn empty_string_normalizes_to_empty() {
        let normalizer = Normalizer::new(Lexicon::new());
        let outcome = normalizer.normalize("turn-1", "");
        assert_eq!(outcome.normalized_text, "");
        assert!(outcome.log.is_empty());
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn currency_won_large_end_to_end() {
        let normalizer = Normalizer::new(Lexicon::new());
        let outcome = normalizer.normalize("turn-1", "2,400만원");
        assert_eq!(outcome.normalized_text, "이천사백만 원");
        assert!(outcome.log.iter().any(|e| e.rule == "currency_won_large"));
    }

    #[test]
    fn lexicon_hit_end_to_end() {
        let mut lexicon = Lexicon::new();
        lexicon.insert(LexiconEntry {
            term: "API".into(),
            reading: "에이피아이".into(),
            variants: vec![],
            category: "acronym".into(),
            priority: LexiconPriority::Global,
            phoneme: None,
        });
        let normalizer = Normalizer::new(lexicon);
        let outcome = normalizer.normalize("turn-1", "API 호출");
        assert_eq!(outcome.normalized_text, "에이피아이 호출");
        assert!(outcome.log.iter().any(|e| e.rule == "lexicon_lookup"));
    }

    #[test]
    fn percentage_decimal_end_to_end() {
        let normalizer = Normalizer::new(Lexicon::new());
        let outcome = normalizer.normalize("turn-1", "3.14%");
        assert_eq!(outcome.normalized_text, "삼 점 일사 퍼센트");
    }

    #[test]
    fn oov_latin_token_is_reported_as_warning() {
        let normalizer = Normalizer::new(Lexicon::new());
        let outcome = normalizer.normalize("turn-1", "이건 Zyxqq 입니다");
        assert!(outcome.warnings.iter().any(|w| w.token == "Zyxqq"));
    }

    #[test]
    fn normalization_is_idempotent_on_its_own_output() {
        let normalizer = Normalizer::new(Lexicon::new());
        let once = normalizer.normalize("turn-1", "2,400만원 그리고 3.14%");
        let twice = normalizer.normalize("turn-1", &once.normalized_text);
        assert_eq!(once.normalized_text, twice.normalized_text);
    }
}
