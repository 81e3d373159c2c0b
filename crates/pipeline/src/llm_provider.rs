//! HTTP-backed [`LanguageModel`] adapter for LLM-mode scriptwriting
//!
//! Mirrors the request/response shape of the TTS provider adapters
//! (`podcast-tts::providers::openai`): a thin `reqwest` client, bearer
//! auth, and typed (de)serialization of just the fields this pipeline
//! needs from the chat completions response.

use async_trait::async_trait;
use podcast_core::{Error, GenerateRequest, GenerateResponse, LanguageModel, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

pub struct OpenAiLanguageModel {
    client: Client,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl OpenAiLanguageModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self { client: Client::new(), api_key: api_key.into(), model: model.into(), timeout }
    }
}

#[async_trait]
impl LanguageModel for OpenAiLanguageModel {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: &request.system_prompt },
                ChatMessage { role: "user", content: &request.user_prompt },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(ENDPOINT)
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ScriptGeneration(format!("llm request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ScriptGeneration(format!("llm generation failed ({status}): {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::ScriptGeneration(format!("llm response decode failed: {e}")))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::ScriptGeneration("llm response had no choices".to_string()))?;

        Ok(GenerateResponse { text })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
