//! Six-dimension QA scoring
//!
//! Each metric is computed independently from the enriched script, the
//! final mixed audio, and the per-turn synthesis logs, then folded into
//! an overall score and a pass/fail verdict.

use once_cell::sync::Lazy;
use podcast_chemistry::{FORBIDDEN_SLANG, LIBRARY};
use podcast_config::QaSettings;
use podcast_core::{
    ArtifactDetail, EnrichedScript, FinalAudioResult, HumorDetail, PronunciationDetail, QaIssue, QaMetrics, QaReport,
    RepetitionDetail, RhythmDetail, ScriptTurn, Severity, TtsSynthesisResult,
};
use regex::Regex;
use std::collections::HashMap;

static OOV_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Three or more bare Hangul jamo in a row (not composed into a
        // syllable block) almost never occurs in well-formed text.
        Regex::new(r"[\u{3131}-\u{314e}\u{314f}-\u{3163}]{3,}").unwrap(),
        Regex::new(r"\d{5,}").unwrap(),
        Regex::new(r"[A-Za-z]{10,}").unwrap(),
        Regex::new(r"[^\w\s]{2,}").unwrap(),
    ]
});

static LATIN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]{2,}").unwrap());
static NUMERIC_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt() / mean
}

fn oov_tokens_in(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|token| OOV_PATTERNS.iter().any(|re| re.is_match(token)))
        .map(|s| s.to_string())
        .collect()
}

fn number_errors_in(turn: &ScriptTurn) -> Vec<String> {
    NUMERIC_LITERAL
        .find_iter(&turn.raw_text)
        .map(|m| m.as_str().to_string())
        .filter(|literal| !turn.normalization_log.iter().any(|entry| entry.original.contains(literal.as_str())))
        .collect()
}

fn analyze_pronunciation(turns: &[ScriptTurn]) -> (f64, PronunciationDetail) {
    let mut oov_tokens = Vec::new();
    let mut number_errors = Vec::new();
    let mut total_tokens = 0usize;
    let mut latin_runs = 0usize;

    for turn in turns {
        let tokens: Vec<&str> = turn.normalized_text.split_whitespace().collect();
        total_tokens += tokens.len();
        latin_runs += tokens.iter().filter(|t| LATIN_RUN.is_match(t)).count();
        oov_tokens.extend(oov_tokens_in(&turn.normalized_text));
        number_errors.extend(number_errors_in(turn));
    }

    let foreign_word_ratio = if total_tokens == 0 { 0.0 } else { latin_runs as f64 / total_tokens as f64 };
    let ratio_penalty = if foreign_word_ratio > 0.2 { 15.0 } else { 50.0 * foreign_word_ratio };
    let score = (100.0 - 5.0 * oov_tokens.len() as f64 - 3.0 * number_errors.len() as f64 - ratio_penalty).max(0.0);

    (score, PronunciationDetail { oov_tokens, foreign_word_ratio, number_errors })
}

fn analyze_rhythm(turns: &[ScriptTurn]) -> (f64, RhythmDetail) {
    let pauses: Vec<f64> = turns.iter().flat_map(|t| [t.pause_ms_before as f64, t.pause_ms_after as f64]).collect();
    let turn_lengths: Vec<f64> = turns.iter().map(|t| t.normalized_text.chars().count() as f64).collect();

    let pause_cv = coefficient_of_variation(&pauses);
    let turn_length_cv = coefficient_of_variation(&turn_lengths);
    let uniform_pause_detected = pause_cv < 0.1;
    let long_sentence_count = turns.iter().filter(|t| t.normalized_text.chars().count() > 40).count() as u32;

    let score = (100.0
        - 5.0 * long_sentence_count as f64
        - 20.0 * if uniform_pause_detected { 1.0 } else { 0.0 }
        - 10.0 * if turn_length_cv < 0.2 { 1.0 } else { 0.0 })
    .max(0.0);

    (score, RhythmDetail { pause_cv, turn_length_cv, uniform_pause_detected, long_sentence_count })
}

fn ngrams_of(words: &[&str], n: usize) -> Vec<String> {
    if words.len() < n {
        return Vec::new();
    }
    words.windows(n).map(|w| w.join(" ")).collect()
}

fn longest_same_intent_run(turns: &[ScriptTurn]) -> u32 {
    let mut longest = 0u32;
    let mut current = 0u32;
    let mut last_intent = None;
    for turn in turns {
        if Some(turn.intent) == last_intent {
            current += 1;
        } else {
            current = 1;
            last_intent = Some(turn.intent);
        }
        longest = longest.max(current);
    }
    longest
}

fn analyze_repetition(enriched: &EnrichedScript) -> (f64, RepetitionDetail) {
    let mut ngram_counts: HashMap<String, u32> = HashMap::new();
    for turn in &enriched.draft.turns {
        let words: Vec<&str> = turn.normalized_text.split_whitespace().collect();
        for n in [3, 4, 5] {
            for ngram in ngrams_of(&words, n) {
                *ngram_counts.entry(ngram).or_insert(0) += 1;
            }
        }
    }
    let repeated_ngrams: Vec<String> = ngram_counts.into_iter().filter(|(_, count)| *count >= 2).map(|(ngram, _)| ngram).collect();

    let overused_interjections: Vec<String> = enriched
        .interjection_usage
        .iter()
        .filter(|(text, count)| {
            let threshold = if text.as_str() == "맞아요" { 3 } else { 2 };
            **count > threshold
        })
        .map(|(text, _)| text.clone())
        .collect();

    let longest_run = longest_same_intent_run(&enriched.draft.turns);

    let score = (100.0 - 3.0 * repeated_ngrams.len() as f64 - 5.0 * overused_interjections.len() as f64 - 5.0 * (longest_run as f64 - 2.0).max(0.0))
        .max(0.0);

    (score, RepetitionDetail { repeated_ngrams, overused_interjections, longest_same_intent_run: longest_run })
}

fn analyze_humor(enriched: &EnrichedScript) -> (f64, HumorDetail) {
    let interjection_overruns: Vec<String> = enriched
        .interjection_usage
        .iter()
        .filter(|(text, count)| {
            let max = LIBRARY.iter().find(|e| &e.text == *text).map(|e| e.effective_max_usage()).unwrap_or(u32::MAX);
            **count > max
        })
        .map(|(text, _)| text.clone())
        .collect();

    let strong_reaction_overflow = enriched.strong_reaction_count.saturating_sub(2);

    let mut elapsed_sec = 0.0;
    let mut opening_humor_count = 0u32;
    for turn in &enriched.draft.turns {
        if turn.humor_tag.is_some() && elapsed_sec < 90.0 {
            opening_humor_count += 1;
        }
        elapsed_sec += turn.elapsed_contribution_sec();
    }

    let mut forbidden_slang: Vec<String> = Vec::new();
    for turn in &enriched.draft.turns {
        for slang in FORBIDDEN_SLANG.iter() {
            if turn.normalized_text.contains(slang) && !forbidden_slang.contains(&slang.to_string()) {
                forbidden_slang.push(slang.to_string());
            }
        }
    }

    let score = (100.0
        - 10.0 * interjection_overruns.len() as f64
        - 20.0 * if enriched.strong_reaction_count > 2 { 1.0 } else { 0.0 }
        - 15.0 * if opening_humor_count > 1 { 1.0 } else { 0.0 }
        - 10.0 * forbidden_slang.len() as f64)
        .max(0.0);

    (score, HumorDetail { interjection_overruns, strong_reaction_overflow, opening_humor_count, forbidden_slang })
}

fn analyze_artifacts(audio: &FinalAudioResult, synthesis_results: &[TtsSynthesisResult]) -> (f64, ArtifactDetail) {
    let mut clipping_warnings = 0u32;
    let mut sibilance_warnings = 0u32;
    let mut silence_gaps = 0u32;

    for result in synthesis_results {
        for warning in &result.synthesis_log.warnings {
            if warning.contains("clipping") {
                clipping_warnings += 1;
            }
            if warning.contains("sibilance") {
                sibilance_warnings += 1;
            }
            if warning.contains("silence") {
                silence_gaps += 1;
            }
        }
    }

    let volume_jumps = if !(-20.0..=-14.0).contains(&audio.loudness_lufs) { 1 } else { 0 };

    let score = (100.0 - 30.0 * clipping_warnings as f64 - 5.0 * sibilance_warnings as f64 - 10.0 * volume_jumps as f64 - 5.0 * silence_gaps as f64)
        .max(0.0);

    (score, ArtifactDetail { clipping_warnings, sibilance_warnings, volume_jumps, silence_gaps })
}

fn build_issues(metrics: &QaMetrics) -> Vec<QaIssue> {
    let mut issues = Vec::new();

    for slang in &metrics.humor.forbidden_slang {
        issues.push(QaIssue {
            severity: Severity::Critical,
            stage: "humor".to_string(),
            description: format!("forbidden slang detected: {slang}"),
            turn_id: None,
            suggestion: Some("strip the term and re-enter synthesis".to_string()),
        });
    }
    for _ in 0..metrics.artifacts.clipping_warnings {
        issues.push(QaIssue {
            severity: Severity::Critical,
            stage: "artifacts".to_string(),
            description: "synthesis log reports clipping".to_string(),
            turn_id: None,
            suggestion: Some("re-synthesize the affected turn".to_string()),
        });
    }

    if metrics.rhythm.uniform_pause_detected {
        issues.push(QaIssue {
            severity: Severity::Warning,
            stage: "rhythm".to_string(),
            description: "pause durations show almost no variation".to_string(),
            turn_id: None,
            suggestion: None,
        });
    }
    for literal in &metrics.pronunciation.number_errors {
        issues.push(QaIssue {
            severity: Severity::Warning,
            stage: "pronunciation".to_string(),
            description: format!("numeric literal \"{literal}\" was never normalized"),
            turn_id: None,
            suggestion: None,
        });
    }
    for token in &metrics.pronunciation.oov_tokens {
        issues.push(QaIssue {
            severity: Severity::Warning,
            stage: "pronunciation".to_string(),
            description: format!("out-of-vocabulary token: {token}"),
            turn_id: None,
            suggestion: None,
        });
    }
    for ngram in &metrics.repetition.repeated_ngrams {
        issues.push(QaIssue {
            severity: Severity::Warning,
            stage: "repetition".to_string(),
            description: format!("repeated phrase: \"{ngram}\""),
            turn_id: None,
            suggestion: None,
        });
    }
    for text in &metrics.repetition.overused_interjections {
        issues.push(QaIssue {
            severity: Severity::Warning,
            stage: "humor".to_string(),
            description: format!("interjection \"{text}\" used more than its allowance"),
            turn_id: None,
            suggestion: None,
        });
    }
    if metrics.artifacts.sibilance_warnings > 0 {
        issues.push(QaIssue {
            severity: Severity::Warning,
            stage: "artifacts".to_string(),
            description: format!("{} sibilance warning(s) in synthesis logs", metrics.artifacts.sibilance_warnings),
            turn_id: None,
            suggestion: None,
        });
    }
    if metrics.artifacts.volume_jumps > 0 {
        issues.push(QaIssue {
            severity: Severity::Warning,
            stage: "artifacts".to_string(),
            description: "final mix loudness is outside the broadcast window".to_string(),
            turn_id: None,
            suggestion: None,
        });
    }

    for _ in 0..metrics.rhythm.long_sentence_count {
        issues.push(QaIssue {
            severity: Severity::Info,
            stage: "rhythm".to_string(),
            description: "turn exceeds the comfortable sentence length".to_string(),
            turn_id: None,
            suggestion: None,
        });
    }

    issues
}

/// Score the enriched script, final audio, and synthesis logs across all
/// six dimensions and decide whether the episode passes.
pub fn analyze(enriched: &EnrichedScript, audio: &FinalAudioResult, synthesis_results: &[TtsSynthesisResult], settings: &QaSettings) -> QaReport {
    let (pronunciation_score, pronunciation) = analyze_pronunciation(&enriched.draft.turns);
    let (rhythm_score, rhythm) = analyze_rhythm(&enriched.draft.turns);
    let (repetition_score, repetition) = analyze_repetition(enriched);
    let (humor_score, humor) = analyze_humor(enriched);
    let (artifacts_score, artifacts) = analyze_artifacts(audio, synthesis_results);

    let naturalness_score = pronunciation_score * 0.25 + rhythm_score * 0.25 + repetition_score * 0.20 + humor_score * 0.15 + artifacts_score * 0.15;

    let metrics = QaMetrics {
        pronunciation_score,
        rhythm_score,
        repetition_score,
        humor_score,
        artifacts_score,
        naturalness_score,
        pronunciation,
        rhythm,
        repetition,
        humor,
        artifacts,
    };

    let overall_score = ((pronunciation_score + rhythm_score + repetition_score + humor_score + artifacts_score + naturalness_score) / 6.0).round();
    let issues = build_issues(&metrics);
    let passed = QaReport::compute_passed(overall_score, &issues, settings.pass_threshold);
    let selected_strategy = if passed { None } else { Some(crate::regeneration::select_strategy(&metrics, &issues)) };

    QaReport { overall_score, passed, metrics, issues, regeneration_required: !passed, selected_strategy }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcast_core::{AudioFormat, AudioProcessingLog, Intent, NormalizationLogEntry, Pace, ScriptDraft, Speaker, SynthesisLog};

    fn turn(index: usize, text: &str, intent: Intent) -> ScriptTurn {
        ScriptTurn {
            id: format!("t{index}"),
            index,
            speaker: Speaker::HostA,
            raw_text: text.to_string(),
            normalized_text: text.to_string(),
            ssml: None,
            section_id: "sec-0".to_string(),
            intent,
            emphasis_words: vec![],
            pace: Pace::Normal,
            pause_ms_before: 300,
            pause_ms_after: 300,
            estimated_duration_ms: 1000,
            interjection: None,
            laugh_cue_id: None,
            humor_tag: None,
            is_strong_reaction: false,
            normalization_log: vec![],
            lexicon_hits: vec![],
            retry_count: 0,
        }
    }

    fn audio() -> FinalAudioResult {
        FinalAudioResult {
            audio_bytes: vec![],
            format: AudioFormat::Mp3,
            duration_ms: 10000,
            sample_rate: 24000,
            channels: 2,
            loudness_lufs: -16.0,
            chapters: vec![],
            processing_log: AudioProcessingLog::default(),
        }
    }

    fn synthesis_log(warnings: Vec<&str>) -> TtsSynthesisResult {
        TtsSynthesisResult {
            turn_id: "t0".to_string(),
            audio_bytes: vec![],
            duration_ms: 1000,
            format: AudioFormat::Mp3,
            sample_rate: 24000,
            synthesis_log: SynthesisLog {
                provider: "google".to_string(),
                voice_id: "v".to_string(),
                request_time_ms: 0,
                lexicon_hits: 0,
                retries: 0,
                warnings: warnings.into_iter().map(String::from).collect(),
            },
        }
    }

    #[test]
    fn clean_script_passes_with_default_threshold() {
        let turns = vec![turn(0, "오늘은 날씨가 정말 좋네요", Intent::OpenerHook), turn(1, "그러게요 산책하기 딱이에요", Intent::React)];
        let enriched = EnrichedScript::new(ScriptDraft { turns, segments: vec![] });
        let settings = QaSettings { pass_threshold: 78.0 };
        let report = analyze(&enriched, &audio(), &[synthesis_log(vec![])], &settings);
        assert!(report.passed);
        assert!(!report.has_critical_issue());
    }

    #[test]
    fn clipping_warning_fails_with_critical_issue_and_resynthesize_strategy() {
        let turns = vec![turn(0, "테스트 문장", Intent::ExplainPoint)];
        let enriched = EnrichedScript::new(ScriptDraft { turns, segments: vec![] });
        let settings = QaSettings { pass_threshold: 78.0 };
        let report = analyze(&enriched, &audio(), &[synthesis_log(vec!["clipping detected at 3.2s"])], &settings);
        assert!(!report.passed);
        assert!(report.has_critical_issue());
        assert_eq!(report.selected_strategy, Some(podcast_core::RegenerationStrategy::ReSynthesize));
    }

    #[test]
    fn forbidden_slang_turn_fails_with_critical_issue_and_adjust_script_strategy() {
        let turns = vec![turn(0, "이건 레전드야", Intent::React)];
        let enriched = EnrichedScript::new(ScriptDraft { turns, segments: vec![] });
        let settings = QaSettings { pass_threshold: 78.0 };
        let report = analyze(&enriched, &audio(), &[synthesis_log(vec![])], &settings);
        assert!(!report.passed);
        assert!(report.has_critical_issue());
        assert_eq!(report.selected_strategy, Some(podcast_core::RegenerationStrategy::AdjustScript));
    }

    #[test]
    fn number_literal_missing_from_normalization_log_is_flagged() {
        let mut t = turn(0, "2,400만원이 들었어요", Intent::ExplainPoint);
        t.normalization_log = vec![];
        let enriched = EnrichedScript::new(ScriptDraft { turns: vec![t], segments: vec![] });
        let settings = QaSettings { pass_threshold: 78.0 };
        let report = analyze(&enriched, &audio(), &[], &settings);
        assert!(!report.metrics.pronunciation.number_errors.is_empty());
    }

    #[test]
    fn number_literal_present_in_normalization_log_is_not_flagged() {
        let mut t = turn(0, "2400원이 들었어요", Intent::ExplainPoint);
        t.normalization_log = vec![NormalizationLogEntry {
            original: "2400".to_string(),
            normalized: "이천사백 원".to_string(),
            rule: "currency".to_string(),
            start: 0,
            end: 4,
        }];
        let enriched = EnrichedScript::new(ScriptDraft { turns: vec![t], segments: vec![] });
        let settings = QaSettings { pass_threshold: 78.0 };
        let report = analyze(&enriched, &audio(), &[], &settings);
        assert!(report.metrics.pronunciation.number_errors.is_empty());
    }
}
