//! Regeneration strategy selection and the one in-place repair that
//! doesn't need another crate's help
//!
//! `re_normalize`, `regenerate_script`, `re_synthesize`, and
//! `full_regeneration` all re-enter another stage of the pipeline, so
//! their dispatch lives in the orchestrator. `adjust_script` only edits
//! the enriched script in place, so it's implemented here alongside the
//! selection logic that picks it.

use podcast_chemistry::{FORBIDDEN_SLANG, LIBRARY};
use podcast_core::{EnrichedScript, QaIssue, QaMetrics, RegenerationStrategy, Severity};
use std::collections::HashMap;

/// Pick the cheapest strategy that addresses the dominant failure class,
/// in priority order.
pub fn select_strategy(metrics: &QaMetrics, issues: &[QaIssue]) -> RegenerationStrategy {
    if metrics.artifacts.clipping_warnings > 0 {
        return RegenerationStrategy::ReSynthesize;
    }
    if !metrics.humor.forbidden_slang.is_empty() {
        return RegenerationStrategy::AdjustScript;
    }
    if metrics.pronunciation_score < 70.0 {
        return RegenerationStrategy::ReNormalize;
    }
    if metrics.rhythm_score < 60.0 || metrics.repetition_score < 60.0 || metrics.humor_score < 60.0 {
        return RegenerationStrategy::RegenerateScript;
    }
    if metrics.naturalness_score < 60.0 {
        return RegenerationStrategy::FullRegeneration;
    }
    let _ = issues;
    RegenerationStrategy::AdjustScript
}

/// Strip banned terms from every turn's text and prune interjections
/// beyond each entry's per-episode allowance, in place.
pub fn apply_adjust_script(enriched: &mut EnrichedScript) {
    for turn in enriched.draft.turns.iter_mut() {
        for slang in FORBIDDEN_SLANG.iter() {
            if turn.normalized_text.contains(slang) {
                turn.normalized_text = turn.normalized_text.replace(slang, "");
            }
            if turn.raw_text.contains(slang) {
                turn.raw_text = turn.raw_text.replace(slang, "");
            }
        }
    }

    let mut seen: HashMap<String, u32> = HashMap::new();
    let EnrichedScript { draft, interjection_usage, .. } = enriched;
    for turn in draft.turns.iter_mut() {
        let Some(interjection) = turn.interjection.clone() else { continue };
        let max = LIBRARY.iter().find(|e| e.text == interjection.text).map(|e| e.effective_max_usage()).unwrap_or(u32::MAX);
        let count = seen.entry(interjection.text.clone()).or_insert(0);
        *count += 1;
        if *count > max {
            turn.interjection = None;
            if let Some(usage) = interjection_usage.get_mut(&interjection.text) {
                *usage = usage.saturating_sub(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcast_core::{ArtifactDetail, HumorDetail, PronunciationDetail, RepetitionDetail, RhythmDetail};

    fn metrics() -> QaMetrics {
        QaMetrics {
            pronunciation_score: 100.0,
            rhythm_score: 100.0,
            repetition_score: 100.0,
            humor_score: 100.0,
            artifacts_score: 100.0,
            naturalness_score: 100.0,
            pronunciation: PronunciationDetail::default(),
            rhythm: RhythmDetail::default(),
            repetition: RepetitionDetail::default(),
            humor: HumorDetail::default(),
            artifacts: ArtifactDetail::default(),
        }
    }

    #[test]
    fn clipping_outranks_everything_else() {
        let mut m = metrics();
        m.artifacts.clipping_warnings = 1;
        m.humor.forbidden_slang = vec!["slur".to_string()];
        assert_eq!(select_strategy(&m, &[]), RegenerationStrategy::ReSynthesize);
    }

    #[test]
    fn forbidden_slang_picks_adjust_script_when_no_clipping() {
        let mut m = metrics();
        m.humor.forbidden_slang = vec!["slur".to_string()];
        assert_eq!(select_strategy(&m, &[]), RegenerationStrategy::AdjustScript);
    }

    #[test]
    fn low_pronunciation_score_picks_re_normalize() {
        let mut m = metrics();
        m.pronunciation_score = 65.0;
        assert_eq!(select_strategy(&m, &[]), RegenerationStrategy::ReNormalize);
    }

    #[test]
    fn low_rhythm_score_picks_regenerate_script() {
        let mut m = metrics();
        m.rhythm_score = 55.0;
        assert_eq!(select_strategy(&m, &[]), RegenerationStrategy::RegenerateScript);
    }

    #[test]
    fn low_naturalness_picks_full_regeneration() {
        let mut m = metrics();
        m.naturalness_score = 50.0;
        assert_eq!(select_strategy(&m, &[]), RegenerationStrategy::FullRegeneration);
    }

    #[test]
    fn otherwise_falls_back_to_adjust_script() {
        let mut m = metrics();
        m.pronunciation_score = 90.0;
        assert_eq!(select_strategy(&m, &[]), RegenerationStrategy::AdjustScript);
    }

    #[test]
    fn adjust_script_strips_slang_and_prunes_excess_interjections() {
        use podcast_core::{Intent, InterjectionPosition, Pace, ScriptDraft, ScriptTurn, Speaker, TurnInterjection};

        let allowed_text = LIBRARY[0].text.clone();
        let max_usage = LIBRARY[0].effective_max_usage();

        let mut turns = Vec::new();
        for i in 0..(max_usage + 1) {
            turns.push(ScriptTurn {
                id: format!("t{i}"),
                index: i as usize,
                speaker: Speaker::HostB,
                raw_text: "괜찮은 대사입니다".to_string(),
                normalized_text: "괜찮은 대사입니다".to_string(),
                ssml: None,
                section_id: "sec-0".to_string(),
                intent: Intent::React,
                emphasis_words: vec![],
                pace: Pace::Normal,
                pause_ms_before: 0,
                pause_ms_after: 0,
                estimated_duration_ms: 1000,
                interjection: Some(TurnInterjection { text: allowed_text.clone(), category: "approval".to_string(), position: InterjectionPosition::Start }),
                laugh_cue_id: None,
                humor_tag: None,
                is_strong_reaction: false,
                normalization_log: vec![],
                lexicon_hits: vec![],
                retry_count: 0,
            });
        }

        let mut enriched = EnrichedScript::new(ScriptDraft { turns, segments: vec![] });
        enriched.interjection_usage.insert(allowed_text.clone(), max_usage + 1);

        apply_adjust_script(&mut enriched);

        let remaining = enriched.draft.turns.iter().filter(|t| t.interjection.is_some()).count() as u32;
        assert_eq!(remaining, max_usage);
    }
}
