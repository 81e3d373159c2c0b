//! Six-dimension quality scoring and regeneration strategy selection

pub mod analyzer;
pub mod regeneration;

pub use analyzer::analyze;
pub use regeneration::{apply_adjust_script, select_strategy};
