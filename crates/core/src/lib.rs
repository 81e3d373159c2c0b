//! Shared data model, ports, and error types for the podcast studio pipeline
//!
//! This crate has no behavior of its own — every other crate in the
//! workspace depends on it for the shared data model, the error
//! taxonomy, and the provider-agnostic traits every adapter implements.

pub mod audio_result;
pub mod enriched;
pub mod error;
pub mod interjection;
pub mod outline;
pub mod preset;
pub mod qa;
pub mod retry;
pub mod script;
pub mod source;
pub mod traits;
pub mod tts_result;
pub mod voice;

pub use audio_result::{AudioProcessingLog, ChapterMarker, FinalAudioResult};
pub use enriched::{CallbackRef, EnrichedScript, HumorCue, LaughCue, LaughIntensity};
pub use error::{Error, NormalizationWarning, Result};
pub use interjection::{InterjectionCategory, InterjectionEntry, Intensity};
pub use outline::{ContentOutline, ExtractedNumber, OutlineSection, SectionType};
pub use preset::{BanterLevel, StylePreset};
pub use qa::{
    ArtifactDetail, HumorDetail, PronunciationDetail, QaIssue, QaMetrics, QaReport,
    RegenerationStrategy, RepetitionDetail, RhythmDetail, Severity,
};
pub use retry::with_retries;
pub use script::{
    Intent, InterjectionPosition, NormalizationLogEntry, Pace, ScriptDraft, ScriptSegment,
    ScriptTurn, Speaker, TurnInterjection,
};
pub use source::{SourceDocument, SourceType};
pub use traits::{GenerateRequest, GenerateResponse, LanguageModel, LoudnessMeasurement, MediaTool, TtsProvider};
pub use tts_result::{AudioFormat, SynthesisLog, TtsSynthesisResult};
pub use voice::{TtsProviderId, VoiceGender, VoiceProfile, VoiceRole};
