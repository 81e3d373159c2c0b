//! TTS synthesis results

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    Wav,
    Mp3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisLog {
    pub provider: String,
    pub voice_id: String,
    pub request_time_ms: u64,
    pub lexicon_hits: u32,
    pub retries: u32,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsSynthesisResult {
    pub turn_id: String,
    #[serde(skip)]
    pub audio_bytes: Vec<u8>,
    pub duration_ms: u64,
    pub format: AudioFormat,
    pub sample_rate: u32,
    pub synthesis_log: SynthesisLog,
}

impl TtsSynthesisResult {
    /// Estimate duration from normalized text when the provider doesn't
    /// return one: chars excluding spaces / 5 * 1000.
    pub fn estimate_duration_ms(normalized_text: &str) -> u64 {
        let chars = normalized_text.chars().filter(|c| !c.is_whitespace()).count() as f64;
        ((chars / 5.0) * 1000.0).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_duration_matches_formula() {
        // 10 non-space chars -> 2000ms
        assert_eq!(TtsSynthesisResult::estimate_duration_ms("가나다라마바사아자차"), 2000);
    }
}
