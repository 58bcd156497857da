use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_host")]
    pub host: String,
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Static bearer token for `POST /api/generate-lead`.
    #[serde(default)]
    pub admin_secret: Option<String>,
    /// Lower bound; raised at startup to cover a full cycle including every
    /// provider call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_gateway_port() -> u16 {
    4321
}

fn default_request_timeout_secs() -> u64 {
    360
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            admin_secret: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "gateway.request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn require_admin_secret(&self) -> Result<&str, ConfigError> {
        self.admin_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or(ConfigError::MissingCredential("gateway.admin_secret"))
    }
}
