//! OpenAI speech adapter
//!
//! SSML is unsupported, so the plain normalized text (with laugh markers
//! and interjections folded in by [`crate::ssml::plain_text`]) is sent
//! instead. `role` maps to a voice name, and speed is passed directly.

use crate::ssml;
use async_trait::async_trait;
use podcast_core::{
    AudioFormat, Error, Result, ScriptTurn, SynthesisLog, TtsProvider, TtsSynthesisResult, VoiceProfile, VoiceRole,
};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const ENDPOINT: &str = "https://api.openai.com/v1/audio/speech";

fn voice_name_for(role: VoiceRole, is_primary: bool) -> &'static str {
    match (role, is_primary) {
        (VoiceRole::StableExplainer, true) => "onyx",
        (VoiceRole::StableExplainer, false) => "echo",
        (VoiceRole::ReactiveCurious, true) => "nova",
        (VoiceRole::ReactiveCurious, false) => "alloy",
        (VoiceRole::ExpertGuest, _) => "echo",
    }
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'static str,
    input: &'a str,
    voice: &'a str,
    speed: f32,
}

pub struct OpenAiTtsProvider {
    client: Client,
    api_key: String,
    timeout: Duration,
}

impl OpenAiTtsProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self { client: Client::new(), api_key: api_key.into(), timeout }
    }
}

#[async_trait]
impl TtsProvider for OpenAiTtsProvider {
    async fn synthesize_turn(&self, turn: &ScriptTurn, _ssml_or_text: &str, voice: &VoiceProfile) -> Result<TtsSynthesisResult> {
        let start = std::time::Instant::now();
        let text = ssml::plain_text(turn);
        let voice_name = voice_name_for(voice.role, turn.speaker == podcast_core::Speaker::HostA);

        let request = SpeechRequest {
            model: "tts-1",
            input: &text,
            voice: voice_name,
            speed: voice.speaking_rate,
        };

        let response = self
            .client
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Tts(format!("openai request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("openai synthesis failed ({status}): {body}")));
        }

        let audio_bytes = response.bytes().await.map_err(|e| Error::Tts(format!("openai body read failed: {e}")))?.to_vec();

        Ok(TtsSynthesisResult {
            turn_id: turn.id.clone(),
            duration_ms: TtsSynthesisResult::estimate_duration_ms(&turn.normalized_text),
            audio_bytes,
            format: AudioFormat::Mp3,
            sample_rate: 24000,
            synthesis_log: SynthesisLog {
                provider: self.provider_name().to_string(),
                voice_id: voice_name.to_string(),
                request_time_ms: start.elapsed().as_millis() as u64,
                lexicon_hits: 0,
                retries: 0,
                warnings: Vec::new(),
            },
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
