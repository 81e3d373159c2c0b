//! QA report types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaIssue {
    pub severity: Severity,
    pub stage: String,
    pub description: String,
    pub turn_id: Option<String>,
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PronunciationDetail {
    pub oov_tokens: Vec<String>,
    pub foreign_word_ratio: f64,
    pub number_errors: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RhythmDetail {
    pub pause_cv: f64,
    pub turn_length_cv: f64,
    pub uniform_pause_detected: bool,
    pub long_sentence_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepetitionDetail {
    pub repeated_ngrams: Vec<String>,
    pub overused_interjections: Vec<String>,
    pub longest_same_intent_run: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumorDetail {
    pub interjection_overruns: Vec<String>,
    pub strong_reaction_overflow: u32,
    pub opening_humor_count: u32,
    pub forbidden_slang: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactDetail {
    pub clipping_warnings: u32,
    pub sibilance_warnings: u32,
    pub volume_jumps: u32,
    pub silence_gaps: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaMetrics {
    pub pronunciation_score: f64,
    pub rhythm_score: f64,
    pub repetition_score: f64,
    pub humor_score: f64,
    pub artifacts_score: f64,
    pub naturalness_score: f64,

    pub pronunciation: PronunciationDetail,
    pub rhythm: RhythmDetail,
    pub repetition: RepetitionDetail,
    pub humor: HumorDetail,
    pub artifacts: ArtifactDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegenerationStrategy {
    ReNormalize,
    AdjustScript,
    RegenerateScript,
    ReSynthesize,
    FullRegeneration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaReport {
    pub overall_score: f64,
    pub passed: bool,
    pub metrics: QaMetrics,
    pub issues: Vec<QaIssue>,
    pub regeneration_required: bool,
    pub selected_strategy: Option<RegenerationStrategy>,
}

impl QaReport {
    pub fn has_critical_issue(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Critical)
    }

    /// Pass criterion: overall >= threshold AND no critical issues.
    pub fn compute_passed(overall_score: f64, issues: &[QaIssue], threshold: f64) -> bool {
        overall_score >= threshold && !issues.iter().any(|i| i.severity == Severity::Critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_only_with_no_critical_and_score_at_threshold() {
        let issues = vec![QaIssue {
            severity: Severity::Warning,
            stage: "qa".into(),
            description: "minor".into(),
            turn_id: None,
            suggestion: None,
        }];
        assert!(QaReport::compute_passed(78.0, &issues, 78.0));
        assert!(!QaReport::compute_passed(77.9, &issues, 78.0));

        let critical = vec![QaIssue {
            severity: Severity::Critical,
            stage: "qa".into(),
            description: "clipping".into(),
            turn_id: None,
            suggestion: None,
        }];
        assert!(!QaReport::compute_passed(99.0, &critical, 78.0));
    }
}
