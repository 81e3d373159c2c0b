//! The enriched script: a [`ScriptDraft`](crate::script::ScriptDraft) plus the
//! chemistry engine's derived tables.

use crate::script::ScriptDraft;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaughIntensity {
    LightChuckle,
    SoftLaugh,
    BigLaugh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumorCue {
    pub humor_type: String,
    pub target_turn_index: usize,
    pub callback_reference: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaughCue {
    pub intensity: LaughIntensity,
    pub insert_after_turn_index: usize,
    pub duration_ms: u32,
    /// dB offset, must lie in [-10, -6]
    pub volume_offset_db: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackRef {
    pub source_turn_index: usize,
    pub target_turn_index: usize,
    pub joke_excerpt: String,
}

/// A script after the chemistry engine has walked it, with the derived
/// interjection/laugh/callback tables it produces along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedScript {
    pub draft: ScriptDraft,
    pub humor_cues: Vec<HumorCue>,
    pub laugh_cues: Vec<LaughCue>,
    pub interjection_usage: HashMap<String, u32>,
    pub strong_reaction_count: u32,
    pub callback_refs: Vec<CallbackRef>,
}

impl EnrichedScript {
    pub fn new(draft: ScriptDraft) -> Self {
        Self {
            draft,
            humor_cues: Vec::new(),
            laugh_cues: Vec::new(),
            interjection_usage: HashMap::new(),
            strong_reaction_count: 0,
            callback_refs: Vec::new(),
        }
    }

    /// Every strong reaction must be followed within two turns by a grounding
    /// statement (non `React`/`CallbackJoke` intent) on the same section.
    pub fn strong_reactions_are_grounded(&self) -> bool {
        let turns = &self.draft.turns;
        for (i, t) in turns.iter().enumerate() {
            if t.is_strong_reaction {
                let grounded = turns[i + 1..(i + 3).min(turns.len())]
                    .iter()
                    .any(|next| next.section_id == t.section_id && !next.is_strong_reaction);
                if !grounded {
                    return false;
                }
            }
        }
        true
    }
}
