use crate::error::ProviderError;
use async_trait::async_trait;
use serde::Serialize;

/// One request/response exchange with a text generation provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system_prompt: Option<String>,
    pub prompt: String,
    pub model: String,
    pub temperature: f64,
    /// Upper bound on generated output tokens.
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            system_prompt: None,
            prompt: prompt.into(),
            model: model.into(),
            temperature: 0.85,
            max_tokens: 256,
        }
    }

    pub fn with_system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Short provider label used in errors and logs.
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;
}
