use super::http_client::build_provider_client;
use super::scrub::{api_error, transport_error};
use super::traits::{CompletionRequest, Provider};
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Chat-completions client. Also serves OpenAI-compatible endpoints
/// (OpenRouter, local Ollama) through a custom base URL.
pub struct OpenAiProvider {
    name: String,
    /// Pre-computed `"Bearer <key>"` header value.
    cached_auth_header: Option<String>,
    cached_completions_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<&str>) -> Self {
        Self::compatible("openai", DEFAULT_BASE_URL, api_key, 0)
    }

    pub fn compatible(name: &str, base_url: &str, api_key: Option<&str>, timeout_secs: u64) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            name: name.to_string(),
            cached_auth_header: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(|k| format!("Bearer {k}")),
            cached_completions_url: format!("{base}/v1/chat/completions"),
            client: build_provider_client(timeout_secs),
        }
    }

    fn build_request(request: &CompletionRequest) -> ChatRequest<'_> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_prompt.as_deref() {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }
        messages.push(Message {
            role: "user",
            content: &request.prompt,
        });

        ChatRequest {
            model: &request.model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let mut http = self
            .client
            .post(&self.cached_completions_url)
            .json(&Self::build_request(request));
        if let Some(auth) = &self.cached_auth_header {
            http = http.header("Authorization", auth);
        }

        let response = http
            .send()
            .await
            .map_err(|e| transport_error(&self.name, &e))?;

        if !response.status().is_success() {
            return Err(api_error(&self.name, response).await);
        }

        let body: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::MalformedResponse {
                    provider: self.name.clone(),
                    message: e.to_string(),
                })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse {
                provider: self.name.clone(),
                message: "response contained no message content".into(),
            })
    }
}
