use super::postprocess::postprocess;
use super::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::corpus::HistoricalRecord;
use crate::error::ProviderError;
use crate::persona::{LengthTarget, StyleProfile};
use crate::providers::{CompletionRequest, Provider};
use async_trait::async_trait;
use std::sync::Arc;

/// Produces one candidate text conditioned on examples, style and length.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        examples: &[HistoricalRecord],
        style: &StyleProfile,
        length: &LengthTarget,
    ) -> Result<String, ProviderError>;
}

/// [`ContentGenerator`] backed by a text generation [`Provider`].
pub struct ProviderGenerator {
    provider: Arc<dyn Provider>,
    model: String,
    max_chars: usize,
}

impl ProviderGenerator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, max_chars: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            max_chars,
        }
    }
}

#[async_trait]
impl ContentGenerator for ProviderGenerator {
    async fn generate(
        &self,
        examples: &[HistoricalRecord],
        style: &StyleProfile,
        length: &LengthTarget,
    ) -> Result<String, ProviderError> {
        let request = CompletionRequest::new(
            build_prompt(examples, style, length, self.max_chars),
            self.model.as_str(),
        )
        .with_system(SYSTEM_PROMPT)
        .with_temperature(style.temperature)
        .with_max_tokens(length.generation_budget);

        let raw = self.provider.complete(&request).await?;
        let text = postprocess(&raw, self.max_chars);
        if text.is_empty() {
            return Err(ProviderError::MalformedResponse {
                provider: self.provider.name().to_string(),
                message: "completion was empty after cleanup".into(),
            });
        }
        Ok(text)
    }
}
