use super::http_client::build_provider_client;
use super::scrub::{api_error, transport_error};
use super::traits::{CompletionRequest, Provider};
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "anthropic";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

pub struct AnthropicProvider {
    /// Pre-computed auth: `("Authorization", "Bearer <token>")` or `("x-api-key", "<key>")`.
    cached_auth: Option<(&'static str, String)>,
    cached_messages_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: [Message<'a>; 1],
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Unsupported,
}

impl AnthropicProvider {
    pub fn new(api_key: Option<&str>) -> Self {
        Self::with_base_url(api_key, None, 0)
    }

    pub fn with_base_url(api_key: Option<&str>, base_url: Option<&str>, timeout_secs: u64) -> Self {
        let base = base_url
            .map_or(DEFAULT_BASE_URL, |u| u.trim_end_matches('/'))
            .to_string();
        let cached_auth = api_key.map(str::trim).filter(|k| !k.is_empty()).map(|k| {
            if Self::is_setup_token(k) {
                ("Authorization", format!("Bearer {k}"))
            } else {
                ("x-api-key", k.to_string())
            }
        });
        Self {
            cached_auth,
            cached_messages_url: format!("{base}/v1/messages"),
            client: build_provider_client(timeout_secs),
        }
    }

    fn is_setup_token(token: &str) -> bool {
        token.starts_with("sk-ant-oat01-")
    }

    fn build_request(request: &CompletionRequest) -> MessagesRequest<'_> {
        MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            system: request.system_prompt.as_deref(),
            messages: [Message {
                role: "user",
                content: &request.prompt,
            }],
            temperature: request.temperature,
        }
    }

    fn extract_text(response: &MessagesResponse) -> Result<String, ProviderError> {
        let text = response
            .content
            .iter()
            .filter_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(text.as_str()),
                ResponseContentBlock::Unsupported => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if text.trim().is_empty() {
            return Err(ProviderError::MalformedResponse {
                provider: PROVIDER.into(),
                message: "response contained no text content".into(),
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let (auth_name, auth_value) = self
            .cached_auth
            .as_ref()
            .ok_or_else(|| ProviderError::Auth {
                provider: PROVIDER.into(),
            })?;

        let response = self
            .client
            .post(&self.cached_messages_url)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .header(*auth_name, auth_value)
            .json(&Self::build_request(request))
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, &e))?;

        if !response.status().is_success() {
            return Err(api_error(PROVIDER, response).await);
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse {
                provider: PROVIDER.into(),
                message: e.to_string(),
            })?;
        Self::extract_text(&body)
    }
}
