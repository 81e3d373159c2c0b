//! Common post-processing shared by both scriptwriter modes: sentence
//! splitting at the preset's length ceiling and the pre-synthesis safety
//! scan

use podcast_core::{ScriptDraft, ScriptSegment, ScriptTurn, StylePreset};
use std::collections::HashMap;

const CONJUNCTIONS: &[&str] = &["그리고", "그래서", "하지만", "그런데", "또한"];

fn split_on_sentence_boundaries(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            parts.push(current.trim().to_string());
            current.clear();
        }
    }
    if !current.trim().is_empty() {
        parts.push(current.trim().to_string());
    }
    parts
}

fn split_on_commas_or_conjunctions(text: &str) -> Vec<String> {
    if text.contains(',') {
        return text.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
    }
    for conj in CONJUNCTIONS {
        if let Some(pos) = text.find(conj) {
            if pos > 0 {
                let (before, after) = text.split_at(pos);
                return vec![before.trim().to_string(), after.trim().to_string()];
            }
        }
    }
    vec![text.to_string()]
}

fn split_text(text: &str, ceiling: usize) -> Vec<String> {
    if text.chars().count() <= ceiling {
        return vec![text.to_string()];
    }
    let sentence_parts = split_on_sentence_boundaries(text);
    if sentence_parts.len() > 1 {
        return sentence_parts.into_iter().flat_map(|p| split_text(&p, ceiling)).collect();
    }
    let comma_parts = split_on_commas_or_conjunctions(text);
    if comma_parts.len() > 1 {
        return comma_parts.into_iter().flat_map(|p| split_text(&p, ceiling)).collect();
    }
    vec![text.to_string()]
}

/// Split any turn whose text exceeds the preset's sentence-length ceiling,
/// re-indexing turns and remapping segment boundaries to match.
pub fn split_long_turns(draft: ScriptDraft, preset: StylePreset) -> ScriptDraft {
    let ceiling = preset.sentence_length_ceiling();
    let mut new_turns: Vec<ScriptTurn> = Vec::new();
    let mut index_map: HashMap<usize, (usize, usize)> = HashMap::new();

    for turn in draft.turns {
        let old_index = turn.index;
        let pieces = split_text(&turn.raw_text, ceiling);
        let last = pieces.len() - 1;
        let start_new = new_turns.len();

        for (i, piece) in pieces.into_iter().enumerate() {
            let mut new_turn = turn.clone();
            new_turn.raw_text = piece.clone();
            new_turn.normalized_text = piece;
            new_turn.index = new_turns.len();
            new_turn.id = format!("turn-{}", new_turn.index);
            if i > 0 {
                new_turn.pause_ms_before = 80;
            }
            if i < last {
                new_turn.pause_ms_after = 80;
            }
            new_turns.push(new_turn);
        }
        index_map.insert(old_index, (start_new, new_turns.len() - 1));
    }

    let new_segments: Vec<ScriptSegment> = draft
        .segments
        .into_iter()
        .map(|seg| {
            let start = index_map.get(&seg.start_index).map(|(s, _)| *s).unwrap_or(seg.start_index);
            let end = index_map.get(&seg.end_index).map(|(_, e)| *e).unwrap_or(seg.end_index);
            ScriptSegment { start_index: start, end_index: end, ..seg }
        })
        .collect();

    for turn in new_turns.iter_mut() {
        turn.clamp_pauses();
    }

    ScriptDraft { turns: new_turns, segments: new_segments }
}

/// Keyword categories flagged by the pre-synthesis safety scan. Matches
/// are recorded, never used to mutate turn text.
const SENSITIVE_TOPICS: &[&str] = &["자살", "마약", "폭력 조장", "혐오 발언", "불법 도박", "테러"];

#[derive(Debug, Clone)]
pub struct SafetyFinding {
    pub turn_index: usize,
    pub term: String,
    pub category: &'static str,
}

pub fn safety_check(draft: &ScriptDraft) -> Vec<SafetyFinding> {
    let mut findings = Vec::new();
    for turn in &draft.turns {
        for term in podcast_chemistry::FORBIDDEN_SLANG.iter() {
            if turn.raw_text.contains(term) {
                findings.push(SafetyFinding { turn_index: turn.index, term: (*term).to_string(), category: "slang" });
            }
        }
        for term in SENSITIVE_TOPICS.iter() {
            if turn.raw_text.contains(term) {
                findings.push(SafetyFinding { turn_index: turn.index, term: (*term).to_string(), category: "sensitive_topic" });
            }
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcast_core::{Intent, Pace, SectionType, Speaker};

    fn long_turn(text: &str) -> ScriptTurn {
        ScriptTurn {
            id: "t0".into(),
            index: 0,
            speaker: Speaker::HostA,
            raw_text: text.into(),
            normalized_text: text.into(),
            ssml: None,
            section_id: "sec-0".into(),
            intent: Intent::ExplainPoint,
            emphasis_words: vec![],
            pace: Pace::Normal,
            pause_ms_before: 300,
            pause_ms_after: 200,
            estimated_duration_ms: 0,
            interjection: None,
            laugh_cue_id: None,
            humor_tag: None,
            is_strong_reaction: false,
            normalization_log: vec![],
            lexicon_hits: vec![],
            retry_count: 0,
        }
    }

    #[test]
    fn splits_long_sentence_at_period_boundary() {
        let text = "이것은 아주 긴 문장입니다. 그리고 여기 두 번째 문장도 꽤 길게 이어집니다.";
        let draft = ScriptDraft {
            turns: vec![long_turn(text)],
            segments: vec![ScriptSegment {
                start_index: 0,
                end_index: 0,
                title: "sec".into(),
                section_type: SectionType::Keypoint,
                target_duration_ms: 1000,
                actual_duration_ms: 1000,
            }],
        };
        let split = split_long_turns(draft, StylePreset::Friendly);
        assert!(split.turns.len() > 1);
        assert!(split.turns.iter().all(|t| t.raw_text.chars().count() <= 40));
        assert_eq!(split.segments[0].start_index, 0);
        assert_eq!(split.segments[0].end_index, split.turns.len() - 1);
        assert!(split.indices_are_contiguous());
    }

    #[test]
    fn short_turn_is_left_untouched() {
        let draft = ScriptDraft { turns: vec![long_turn("짧은 문장이에요")], segments: vec![] };
        let split = split_long_turns(draft, StylePreset::Friendly);
        assert_eq!(split.turns.len(), 1);
    }

    #[test]
    fn safety_check_detects_forbidden_slang() {
        let mut turn = long_turn("이거 완전 ㄹㅇ 인정이에요");
        turn.raw_text = "이거 완전 ㄹㅇ 인정이에요".into();
        let draft = ScriptDraft { turns: vec![turn], segments: vec![] };
        let findings = safety_check(&draft);
        assert!(findings.iter().any(|f| f.category == "slang"));
    }
}
