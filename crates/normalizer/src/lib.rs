//! Deterministic Korean text normalization for TTS
//!
//! Converts raw script text into pronunciation-safe Korean: numbers,
//! dates, currency, units and percentages are spelled out, lexicon
//! overrides are applied, and remaining unresolved Latin tokens are
//! surfaced as warnings rather than silently passed through.

pub mod korean_numbers;
pub mod lexicon;
pub mod normalizer;
pub mod rules;
pub mod units;

pub use lexicon::{Lexicon, LexiconEntry, LexiconPriority};
pub use normalizer::{NormalizationOutcome, Normalizer};
pub use rules::{NormalizationRule, RULES};

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizerError {
    #[error("lexicon file not found: {0}")]
    LexiconFileNotFound(String),
    #[error("failed to read lexicon file {path}: {source}")]
    LexiconIo { path: String, #[source] source: std::io::Error },
    #[error("failed to parse lexicon file {path}: {source}")]
    LexiconParse { path: String, #[source] source: serde_json::Error },
}

impl From<NormalizerError> for podcast_core::Error {
    fn from(err: NormalizerError) -> Self {
        podcast_core::Error::Ingest(err.to_string())
    }
}

/// Load a JSON array of [`LexiconEntry`] from disk, tagging every entry's
/// priority tier if it doesn't already match `default_priority`. Used to
/// layer a project- or user-supplied lexicon file on top of the compiled
/// global defaults.
pub fn load_lexicon_file(path: &Path) -> Result<Vec<LexiconEntry>, NormalizerError> {
    if !path.exists() {
        return Err(NormalizerError::LexiconFileNotFound(path.display().to_string()));
    }
    let contents = std::fs::read_to_string(path).map_err(|source| NormalizerError::LexiconIo {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| NormalizerError::LexiconParse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_lexicon_file_is_reported() {
        let err = load_lexicon_file(Path::new("/nonexistent/lexicon.json")).unwrap_err();
        assert!(matches!(err, NormalizerError::LexiconFileNotFound(_)));
    }
}
