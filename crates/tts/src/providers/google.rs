//! Google Cloud Text-to-Speech adapter
//!
//! POSTs SSML to the text-synthesis endpoint; voice is selected by
//! `voiceId` + language code, `speakingRate`/`pitch` ride in the audio
//! config, and output is MP3 at 24 kHz.

use async_trait::async_trait;
use base64::Engine;
use podcast_core::{
    AudioFormat, Error, Result, ScriptTurn, SynthesisLog, TtsProvider, TtsSynthesisResult, VoiceProfile,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
const SAMPLE_RATE: u32 = 24000;

#[derive(Serialize)]
struct SynthesizeRequest<'a> {
    input: Input<'a>,
    voice: VoiceSelection<'a>,
    #[serde(rename = "audioConfig")]
    audio_config: AudioConfig,
}

#[derive(Serialize)]
struct Input<'a> {
    ssml: &'a str,
}

#[derive(Serialize)]
struct VoiceSelection<'a> {
    #[serde(rename = "languageCode")]
    language_code: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
struct AudioConfig {
    #[serde(rename = "audioEncoding")]
    audio_encoding: &'static str,
    #[serde(rename = "sampleRateHertz")]
    sample_rate_hertz: u32,
    #[serde(rename = "speakingRate")]
    speaking_rate: f32,
    pitch: f32,
}

#[derive(Deserialize)]
struct SynthesizeResponse {
    #[serde(rename = "audioContent")]
    audio_content: String,
}

pub struct GoogleTtsProvider {
    client: Client,
    api_key: String,
    timeout: Duration,
}

impl GoogleTtsProvider {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self { client: Client::new(), api_key: api_key.into(), timeout }
    }
}

#[async_trait]
impl TtsProvider for GoogleTtsProvider {
    async fn synthesize_turn(&self, turn: &ScriptTurn, ssml_or_text: &str, voice: &VoiceProfile) -> Result<TtsSynthesisResult> {
        let start = std::time::Instant::now();
        let request = SynthesizeRequest {
            input: Input { ssml: ssml_or_text },
            voice: VoiceSelection { language_code: &voice.language, name: &voice.voice_id },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                sample_rate_hertz: SAMPLE_RATE,
                speaking_rate: voice.speaking_rate,
                pitch: voice.pitch_offset,
            },
        };

        let response = self
            .client
            .post(ENDPOINT)
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Tts(format!("google request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("google synthesis failed ({status}): {body}")));
        }

        let parsed: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| Error::Tts(format!("google response decode failed: {e}")))?;

        let audio_bytes = base64::engine::general_purpose::STANDARD
            .decode(parsed.audio_content)
            .map_err(|e| Error::Tts(format!("google audio decode failed: {e}")))?;

        Ok(TtsSynthesisResult {
            turn_id: turn.id.clone(),
            duration_ms: TtsSynthesisResult::estimate_duration_ms(&turn.normalized_text),
            audio_bytes,
            format: AudioFormat::Mp3,
            sample_rate: SAMPLE_RATE,
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
        "google"
    }
}
