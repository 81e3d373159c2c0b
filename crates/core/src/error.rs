//! Top-level error type shared by every pipeline stage
//!
//! Each crate defines its own stage-scoped error enum and converts it into
//! [`Error`] at the crate boundary.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds produced by the podcast studio pipeline
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Source ingestion could not parse any paragraphs from the inputs
    #[error("ingest error: {0}")]
    Ingest(String),

    /// LLM unreachable, or the scriptwriter validator exhausted its retries
    #[error("script generation error: {0}")]
    ScriptGeneration(String),

    /// TTS provider unreachable, credential rejected, or voice unsupported
    #[error("tts error: {0}")]
    Tts(String),

    /// The media tool (ffmpeg/ffprobe) failed, or an audio buffer was invalid
    #[error("audio processing error during {stage}: {message}")]
    AudioProcessing { stage: String, message: String },

    /// QA gate failed; carries the report so the regeneration loop can act on it
    #[error("qa failure: overall score {overall_score}")]
    QaFailure {
        overall_score: f64,
        report: Box<crate::qa::QaReport>,
    },

    /// A deadline was exceeded on an outbound call or overall run
    #[error("pipeline timeout in stage {stage} after {elapsed_ms}ms")]
    Timeout { stage: String, elapsed_ms: u64 },

    /// The run was cancelled by the caller
    #[error("pipeline run cancelled at stage {stage}")]
    Cancelled { stage: String },

    /// Configuration could not be loaded or was invalid
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Catch-all for I/O failures when writing final artifacts
    #[error("io error: {0}")]
    Io(String),
}

/// A non-fatal warning collected during normalization (never raised as an error)
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct NormalizationWarning {
    pub turn_id: String,
    pub token: String,
    pub reason: String,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
