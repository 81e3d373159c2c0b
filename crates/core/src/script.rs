//! Script turn types — the atomic dialogue unit and its invariants
//!
//! Pause bounds, contiguous indexing and the like are enforced by the
//! scriptwriter and chemistry engine, not by this type itself (it is a
//! plain data carrier, validated at the producer).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Speaker {
    HostA,
    HostB,
    Guest,
}

impl Speaker {
    /// SCREAMING_SNAKE_CASE tag used to prefix transcript lines, matching
    /// this enum's own serde rename rather than `{:?}`'s `HostA`/`HostB`.
    pub fn transcript_tag(self) -> &'static str {
        match self {
            Speaker::HostA => "HOST_A",
            Speaker::HostB => "HOST_B",
            Speaker::Guest => "GUEST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    OpenerHook,
    IntroduceTopic,
    ExplainPoint,
    AskQuestion,
    GiveExample,
    React,
    Summarize,
    Transition,
    Clarify,
    Counter,
    CallbackJoke,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Slow,
    Normal,
    Fast,
}

impl Pace {
    /// Characters-per-second used to estimate elapsed time
    pub fn chars_per_second(self) -> f64 {
        match self {
            Pace::Slow => 4.0,
            Pace::Normal => 5.0,
            Pace::Fast => 6.0,
        }
    }
}

/// Where an interjection is placed relative to the turn body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterjectionPosition {
    Start,
    End,
}

/// An interjection attached to a turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnInterjection {
    pub text: String,
    pub category: String,
    pub position: InterjectionPosition,
}

/// One entry in a turn's normalization debug log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationLogEntry {
    pub original: String,
    pub normalized: String,
    pub rule: String,
    pub start: usize,
    pub end: usize,
}

/// The atomic dialogue unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptTurn {
    pub id: String,
    pub index: usize,
    pub speaker: Speaker,
    pub raw_text: String,
    pub normalized_text: String,
    pub ssml: Option<String>,
    pub section_id: String,
    pub intent: Intent,
    pub emphasis_words: Vec<String>,
    pub pace: Pace,
    pub pause_ms_before: u32,
    pub pause_ms_after: u32,
    pub estimated_duration_ms: u64,

    // Enrichment (set by the chemistry engine; absent before enrichment)
    pub interjection: Option<TurnInterjection>,
    pub laugh_cue_id: Option<String>,
    pub humor_tag: Option<String>,
    pub is_strong_reaction: bool,

    // Debug fields
    #[serde(default)]
    pub normalization_log: Vec<NormalizationLogEntry>,
    #[serde(default)]
    pub lexicon_hits: Vec<String>,
    #[serde(default)]
    pub retry_count: u32,
}

impl ScriptTurn {
    /// Clamp pause values into the ranges the invariants require
    pub fn clamp_pauses(&mut self) {
        self.pause_ms_before = self.pause_ms_before.min(600);
        self.pause_ms_after = self.pause_ms_after.min(500);
        if self.index == 0 {
            self.pause_ms_before = 0;
        }
    }

    /// Elapsed speaking time contribution of this turn
    pub fn elapsed_contribution_sec(&self) -> f64 {
        let chars_excluding_spaces = self.normalized_text.chars().filter(|c| !c.is_whitespace()).count() as f64;
        let speech_sec = chars_excluding_spaces / self.pace.chars_per_second();
        let pause_sec = (self.pause_ms_before as f64 + self.pause_ms_after as f64) / 1000.0;
        speech_sec + pause_sec
    }
}

/// A contiguous range of turns belonging to one outline section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptSegment {
    pub start_index: usize,
    pub end_index: usize,
    pub title: String,
    pub section_type: crate::outline::SectionType,
    pub target_duration_ms: u64,
    pub actual_duration_ms: u64,
}

/// A draft script: ordered turns plus their segment boundaries, prior to enrichment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptDraft {
    pub turns: Vec<ScriptTurn>,
    pub segments: Vec<ScriptSegment>,
}

impl ScriptDraft {
    /// Verify that turn indices run 0..n with no gaps
    pub fn indices_are_contiguous(&self) -> bool {
        self.turns.iter().enumerate().all(|(i, t)| t.index == i)
    }

    pub fn total_estimated_duration_ms(&self) -> u64 {
        self.turns.iter().map(|t| t.estimated_duration_ms).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(index: usize, pace: Pace, text: &str) -> ScriptTurn {
        ScriptTurn {
            id: format!("t{index}"),
            index,
            speaker: Speaker::HostA,
            raw_text: text.into(),
            normalized_text: text.into(),
            ssml: None,
            section_id: "sec-0".into(),
            intent: Intent::ExplainPoint,
            emphasis_words: vec![],
            pace,
            pause_ms_before: 1000,
            pause_ms_after: 200,
            estimated_duration_ms: 0,
            interjection: None,
            laugh_cue_id: None,
            humor_tag: None,
            is_strong_reaction: false,
            normalization_log: vec![],
            lexicon_hits: vec![],
            retry_count: 0,
        }
    }

    #[test]
    fn transcript_tag_uses_screaming_snake_case() {
        assert_eq!(Speaker::HostA.transcript_tag(), "HOST_A");
        assert_eq!(Speaker::HostB.transcript_tag(), "HOST_B");
        assert_eq!(Speaker::Guest.transcript_tag(), "GUEST");
    }

    #[test]
    fn clamp_pauses_zeroes_first_turn_and_caps_bounds() {
        let mut t = turn(0, Pace::Normal, "hi");
        t.pause_ms_before = 900;
        t.pause_ms_after = 900;
        t.clamp_pauses();
        assert_eq!(t.pause_ms_before, 0);
        assert_eq!(t.pause_ms_after, 500);
    }

    #[test]
    fn elapsed_contribution_uses_pace_chars_per_second() {
        let t = turn(1, Pace::Slow, "안녕하세요"); // 5 non-space chars
        let elapsed = t.elapsed_contribution_sec();
        // 5 chars / 4 cps + (1000+200)/1000 = 1.25 + 1.2
        assert!((elapsed - 2.45).abs() < 1e-9);
    }

    #[test]
    fn contiguous_indices_detects_gaps() {
        let draft = ScriptDraft {
            turns: vec![turn(0, Pace::Normal, "a"), turn(2, Pace::Normal, "b")],
            segments: vec![],
        };
        assert!(!draft.indices_are_contiguous());
    }
}
