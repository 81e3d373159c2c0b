//! SSML compiler and provider-dispatched TTS adapters
//!
//! [`ssml`] compiles a provider-scoped fragment per turn; [`providers`]
//! dispatches by [`podcast_core::TtsProviderId`] to an HTTP-backed adapter
//! or the development-mode stub; [`batch`] runs synthesis across a
//! concurrency-bounded group of requests, preserving turn order.

pub mod batch;
pub mod providers;
pub mod ssml;

pub use batch::{synthesize_batch, BatchItem};
pub use providers::build_provider;
