//! Development-mode provider: returns silent dummy audio with an estimated
//! duration when no credentials are configured for a provider.

use async_trait::async_trait;
use podcast_core::{
    AudioFormat, Result, ScriptTurn, SynthesisLog, TtsProvider, TtsSynthesisResult, VoiceProfile,
};

/// A minimal WAV header plus zeroed PCM frames, long enough to look like a
/// real buffer to downstream probing while remaining silent.
pub(crate) fn silent_wav(duration_ms: u64, sample_rate: u32) -> Vec<u8> {
    let num_samples = ((duration_ms as f64 / 1000.0) * sample_rate as f64) as u32;
    let data_size = num_samples * 2; // 16-bit mono
    let mut wav = Vec::with_capacity(44 + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&(sample_rate * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.extend(std::iter::repeat(0u8).take(data_size as usize));
    wav
}

pub struct DevModeProvider {
    provider_name: &'static str,
}

impl DevModeProvider {
    pub fn new(provider_name: &'static str) -> Self {
        Self { provider_name }
    }
}

#[async_trait]
impl TtsProvider for DevModeProvider {
    async fn synthesize_turn(&self, turn: &ScriptTurn, _ssml_or_text: &str, voice: &VoiceProfile) -> Result<TtsSynthesisResult> {
        let duration_ms = TtsSynthesisResult::estimate_duration_ms(&turn.normalized_text).max(500);
        let sample_rate = 24000;
        Ok(TtsSynthesisResult {
            turn_id: turn.id.clone(),
            audio_bytes: silent_wav(duration_ms, sample_rate),
            duration_ms,
            format: AudioFormat::Wav,
            sample_rate,
            synthesis_log: SynthesisLog {
                provider: self.provider_name.to_string(),
                voice_id: voice.voice_id.clone(),
                request_time_ms: 0,
                lexicon_hits: 0,
                retries: 0,
                warnings: vec!["development mode: no credentials configured, returning silent audio".to_string()],
            },
        })
    }

    fn provider_name(&self) -> &'static str {
        self.provider_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podcast_core::{Intent, Pace, Speaker, TtsProviderId, VoiceGender, VoiceRole};

    fn turn() -> ScriptTurn {
        ScriptTurn {
            id: "t0".into(),
            index: 0,
            speaker: Speaker::HostA,
            raw_text: "안녕하세요".into(),
            normalized_text: "안녕하세요".into(),
            ssml: None,
            section_id: "sec-0".into(),
            intent: Intent::ExplainPoint,
            emphasis_words: vec![],
            pace: Pace::Normal,
            pause_ms_before: 0,
            pause_ms_after: 0,
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

    #[tokio::test]
    async fn returns_silent_wav_with_estimated_duration() {
        let provider = DevModeProvider::new("google");
        let voice = VoiceProfile {
            provider: TtsProviderId::Google,
            voice_id: "v".into(),
            language: "ko-KR".into(),
            gender: VoiceGender::Female,
            role: VoiceRole::StableExplainer,
            pitch_offset: 0.0,
            speaking_rate: 1.0,
        };
        let result = provider.synthesize_turn(&turn(), "<speak/>", &voice).await.unwrap();
        assert!(!result.audio_bytes.is_empty());
        assert!(result.duration_ms > 0);
        assert_eq!(result.synthesis_log.warnings.len(), 1);
    }
}
