use super::anthropic::AnthropicProvider;
use super::openai::OpenAiProvider;
use super::traits::Provider;
use crate::config::ProviderConfig;
use crate::error::ProviderError;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api";
const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Build the configured provider backend.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn Provider>, ProviderError> {
    let api_key = config.api_key.as_deref();
    let base_url = config.base_url.as_deref();
    let timeout = config.timeout_secs;

    match config.name.as_str() {
        "anthropic" => Ok(Box::new(AnthropicProvider::with_base_url(
            api_key, base_url, timeout,
        ))),
        "openai" => Ok(Box::new(OpenAiProvider::compatible(
            "openai",
            base_url.unwrap_or("https://api.openai.com"),
            api_key,
            timeout,
        ))),
        "openrouter" => Ok(Box::new(OpenAiProvider::compatible(
            "openrouter",
            base_url.unwrap_or(OPENROUTER_BASE_URL),
            api_key,
            timeout,
        ))),
        "ollama" => Ok(Box::new(OpenAiProvider::compatible(
            "ollama",
            base_url.unwrap_or(OLLAMA_BASE_URL),
            None,
            timeout,
        ))),
        other => Err(ProviderError::Unknown(other.to_string())),
    }
}
