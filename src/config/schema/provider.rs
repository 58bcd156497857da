use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// "anthropic" | "openai" | "openrouter" | "ollama"
    #[serde(default = "default_provider_name")]
    pub name: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Override for self-hosted or OpenAI-compatible endpoints.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider_name() -> String {
    "anthropic".into()
}

fn default_model() -> String {
    "claude-haiku-4-5".into()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            api_key: None,
            model: default_model(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// Local runtimes accept unauthenticated requests.
    pub fn requires_api_key(&self) -> bool {
        !self.name.eq_ignore_ascii_case("ollama")
    }
}
