//! TTS provider port

use crate::script::ScriptTurn;
use crate::tts_result::TtsSynthesisResult;
use crate::voice::VoiceProfile;
use async_trait::async_trait;

/// Capability set every TTS provider implements
#[async_trait]
pub trait TtsProvider: Send + Sync + 'static {
    /// Synthesize one turn's compiled SSML/text into audio
    async fn synthesize_turn(
        &self,
        turn: &ScriptTurn,
        ssml_or_text: &str,
        voice: &VoiceProfile,
    ) -> crate::Result<TtsSynthesisResult>;

    /// Estimate duration without performing synthesis (used for planning)
    fn estimate_duration(&self, normalized_text: &str) -> u64 {
        TtsSynthesisResult::estimate_duration_ms(normalized_text)
    }

    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Intent, Pace, Speaker};
    use crate::tts_result::{AudioFormat, SynthesisLog};
    use crate::voice::{TtsProviderId, VoiceGender, VoiceRole};

    struct MockProvider;

    #[async_trait]
    impl TtsProvider for MockProvider {
        async fn synthesize_turn(
            &self,
            turn: &ScriptTurn,
            _ssml_or_text: &str,
            voice: &VoiceProfile,
        ) -> crate::Result<TtsSynthesisResult> {
            Ok(TtsSynthesisResult {
                turn_id: turn.id.clone(),
                audio_bytes: vec![0u8; 4],
                duration_ms: self.estimate_duration(&turn.normalized_text),
                format: AudioFormat::Mp3,
                sample_rate: 24000,
                synthesis_log: SynthesisLog {
                    provider: self.provider_name().to_string(),
                    voice_id: voice.voice_id.clone(),
                    request_time_ms: 5,
                    lexicon_hits: 0,
                    retries: 0,
                    warnings: vec![],
                },
            })
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    fn turn() -> ScriptTurn {
        ScriptTurn {
            id: "t0".into(),
            index: 0,
            speaker: Speaker::HostA,
            raw_text: "가나다라마".into(),
            normalized_text: "가나다라마".into(),
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
    async fn mock_provider_returns_estimated_duration() {
        let provider = MockProvider;
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
        assert_eq!(result.duration_ms, 1000);
    }
}
