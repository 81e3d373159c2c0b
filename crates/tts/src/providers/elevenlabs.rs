//! ElevenLabs adapter
//!
//! POSTs plain text to the voice-scoped endpoint with fixed
//! stability/similarity/style settings and speaker-boost enabled.

use crate::ssml;
use async_trait::async_trait;
use podcast_core::{
    AudioFormat, Error, Result, ScriptTurn, SynthesisLog, TtsProvider, TtsSynthesisResult, VoiceProfile,
};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

fn endpoint_for(voice_id: &str) -> String {
    format!("https://api.elevenlabs.io/v1/text-to-speech/{voice_id}")
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
    style: f32,
    use_speaker_boost: bool,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    voice_settings: VoiceSettings,
}

pub struct ElevenLabsTtsProvider {
    client: Client,
    api_key: String,
    timeout: Duration,
}

impl ElevenLabsTtsProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self { client: Client::new(), api_key: api_key.into(), timeout }
    }
}

#[async_trait]
impl TtsProvider for ElevenLabsTtsProvider {
    async fn synthesize_turn(&self, turn: &ScriptTurn, _ssml_or_text: &str, voice: &VoiceProfile) -> Result<TtsSynthesisResult> {
        let start = std::time::Instant::now();
        let text = ssml::plain_text(turn);

        let request = SpeechRequest {
            text: &text,
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.75,
                style: 0.3,
                use_speaker_boost: true,
            },
        };

        let response = self
            .client
            .post(endpoint_for(&voice.voice_id))
            .header("xi-api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Tts(format!("elevenlabs request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("elevenlabs synthesis failed ({status}): {body}")));
        }

        let audio_bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Tts(format!("elevenlabs body read failed: {e}")))?
            .to_vec();

        Ok(TtsSynthesisResult {
            turn_id: turn.id.clone(),
            duration_ms: TtsSynthesisResult::estimate_duration_ms(&turn.normalized_text),
            audio_bytes,
            format: AudioFormat::Mp3,
            sample_rate: 24000,
            synthesis_log: SynthesisLog {
                provider: self.provider_name().to_string(),
                voice_id: voice.voice_id.clone(),
                request_time_ms: start.elapsed().as_millis() as u64,
                lexicon_hits: 0,
                retries: 0,
                warnings: Vec::new(),
            },
        })
    }

    fn provider_name(&self) -> &'static str {
        "elevenlabs"
    }
}
