//! Voice profile types for TTS synthesis

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtsProviderId {
    Google,
    OpenAi,
    ElevenLabs,
    Azure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceGender {
    Male,
    Female,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceRole {
    StableExplainer,
    ReactiveCurious,
    ExpertGuest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceProfile {
    pub provider: TtsProviderId,
    pub voice_id: String,
    pub language: String,
    pub gender: VoiceGender,
    pub role: VoiceRole,
    /// Semitones, -20..20
    pub pitch_offset: f32,
    /// 0.25..4.0
    pub speaking_rate: f32,
}

impl VoiceProfile {
    pub fn clamp(&mut self) {
        self.pitch_offset = self.pitch_offset.clamp(-20.0, 20.0);
        self.speaking_rate = self.speaking_rate.clamp(0.25, 4.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds_pitch_and_rate() {
        let mut v = VoiceProfile {
            provider: TtsProviderId::Google,
            voice_id: "ko-KR-Standard-A".into(),
            language: "ko-KR".into(),
            gender: VoiceGender::Female,
            role: VoiceRole::StableExplainer,
            pitch_offset: 99.0,
            speaking_rate: 10.0,
        };
        v.clamp();
        assert_eq!(v.pitch_offset, 20.0);
        assert_eq!(v.speaking_rate, 4.0);
    }
}
