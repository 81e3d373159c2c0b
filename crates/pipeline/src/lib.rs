//! Stage orchestration for the podcast studio pipeline
//!
//! Ties every other crate in the workspace together: source ingestion,
//! the regeneration loop around scriptwriting/normalization/synthesis/
//! audio/QA, and the external-facing input/output types. The CLI binary
//! in `src/bin/render_episode.rs` is a thin shell around [`Orchestrator`].

pub mod ingest;
pub mod llm_provider;
pub mod orchestrator;
pub mod timeline;
pub mod types;
pub mod voices;

pub use ingest::ingest;
pub use orchestrator::{build_llm, Orchestrator};
pub use timeline::{DebugTimeline, TimelineEvent};
pub use types::{PipelineInput, PipelineOutput, RunMetadata, Statistics};
