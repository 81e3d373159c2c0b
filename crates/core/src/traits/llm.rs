//! Language model port used by the LLM-mode scriptwriter

use async_trait::async_trait;

/// A chat-style generation request
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerateRequest {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            max_tokens: 4096,
            temperature: 0.8,
        }
    }
}

/// A generation response: untrusted text, parsed downstream with explicit
/// regexes rather than structured deserialization, since providers don't
/// agree on a structured script format.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub text: String,
}

/// Language model interface
///
/// Implementations dispatch to a real provider over HTTP, or (in
/// development mode, no credentials configured) return a deterministic
/// template-shaped stub so the rest of the pipeline can run end to end.
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    async fn generate(&self, request: GenerateRequest) -> crate::Result<GenerateResponse>;

    /// Model name for logging
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockLlm;

    #[async_trait]
    impl LanguageModel for MockLlm {
        async fn generate(&self, request: GenerateRequest) -> crate::Result<GenerateResponse> {
            Ok(GenerateResponse {
                text: format!("echo: {}", request.user_prompt),
            })
        }

        fn model_name(&self) -> &str {
            "mock-llm"
        }
    }

    #[tokio::test]
    async fn mock_llm_echoes_user_prompt() {
        let llm = MockLlm;
        let resp = llm
            .generate(GenerateRequest::new("sys", "hello"))
            .await
            .unwrap();
        assert_eq!(resp.text, "echo: hello");
    }
}
