//! External interface types for a pipeline run

use podcast_config::PipelineConfig;
use podcast_core::{QaReport, SourceDocument};
use podcast_normalizer::LexiconEntry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Free-form run metadata a caller may attach to an episode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunMetadata {
    pub topic: Option<String>,
    pub audience: Option<String>,
    pub tone: Option<String>,
}

/// Everything the orchestrator needs to render one episode
pub struct PipelineInput {
    pub sources: Vec<SourceDocument>,
    pub config: PipelineConfig,
    /// Overrides layered on top of the compiled-in lexicon, highest
    /// priority tier wins per entry.
    pub user_lexicon: Vec<LexiconEntry>,
    pub metadata: RunMetadata,
    /// Directory the final artifacts are written into; created if absent.
    pub output_dir: PathBuf,
}

/// Aggregate run statistics derived from the stages' own outputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total_duration_ms: u64,
    pub turn_count: usize,
    pub regeneration_attempts: u32,
    pub processing_time_ms: u64,
    pub lexicon_hits: u32,
    pub normalization_changes: u32,
    pub laughs_inserted: u32,
}

/// The result of one pipeline run, with absolute paths to every exported
/// artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub success: bool,
    pub audio_path: PathBuf,
    pub transcript_path: PathBuf,
    pub script_json_path: PathBuf,
    pub chapters_json_path: PathBuf,
    pub qa_report_path: PathBuf,
    pub debug_bundle_path: Option<PathBuf>,
    pub stats: Statistics,
    pub qa_report: QaReport,
}
