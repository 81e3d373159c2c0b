//! Interjection library, chemistry engine, and humor QA validation

pub mod engine;
pub mod library;

pub use engine::{ChemistryEngine, HumorQaReport};
pub use library::{FORBIDDEN_SLANG, LIBRARY, STRONG_REACTIONS};
