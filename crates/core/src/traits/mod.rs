//! Pluggable backend traits ("ports") for the pipeline
//!
//! Small async-trait port interfaces, one implementation per provider,
//! dispatched through a tagged-union field rather than dynamic
//! registration.

pub mod llm;
pub mod media;
pub mod tts;

pub use llm::{GenerateRequest, GenerateResponse, LanguageModel};
pub use media::{LoudnessMeasurement, MediaTool};
pub use tts::TtsProvider;
