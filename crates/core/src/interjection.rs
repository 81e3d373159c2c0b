//! Interjection library record types
//!
//! The static library table itself lives in `podcast-chemistry`; this
//! module defines the shared record shape so `podcast-core` can express
//! its invariants without depending on the chemistry crate.

use crate::script::Speaker;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterjectionCategory {
    SurpriseWow,
    ApprovalRespect,
    Empathy,
    Thinking,
    LaughCue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Weak,
    Medium,
    Strong,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterjectionEntry {
    pub id: String,
    pub text: String,
    pub category: InterjectionCategory,
    pub intensity: Intensity,
    pub allowed_speakers: Vec<Speaker>,
    pub max_usage_per_episode: u32,
    pub min_turn_gap: usize,
    #[serde(default)]
    pub forbidden_sections: Vec<String>,
}

impl InterjectionEntry {
    /// The default cap is 2, but "맞아요" is 3 and strong-intensity entries
    /// cap at 2 regardless of what is configured.
    pub fn effective_max_usage(&self) -> u32 {
        if self.text == "맞아요" {
            3
        } else if self.intensity == Intensity::Strong {
            self.max_usage_per_episode.min(2)
        } else {
            self.max_usage_per_episode
        }
    }
}
