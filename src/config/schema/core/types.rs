use super::super::{GatewayConfig, GenerationConfig, ProviderConfig, SchedulerConfig, StoreConfig};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

/// Slack on top of the provider calls for sampling, scoring and the commit.
const CYCLE_TIMEOUT_MARGIN_SECS: u64 = 60;

fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
        let synthlead_dir = home.join(".synthlead");

        Self {
            workspace_dir: synthlead_dir.join("workspace"),
            config_path: synthlead_dir.join("config.toml"),
            log_level: default_log_level(),
            provider: ProviderConfig::default(),
            generation: GenerationConfig::default(),
            scheduler: SchedulerConfig::default(),
            gateway: GatewayConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;
        self.scheduler.validate()?;
        self.gateway.validate()?;
        Ok(())
    }

    /// Resolved SQLite path: explicit `[store] path`, else `<workspace>/synthlead.db`.
    pub fn database_path(&self) -> PathBuf {
        self.store
            .path
            .as_ref()
            .map_or_else(|| self.workspace_dir.join("synthlead.db"), PathBuf::from)
    }

    /// The provider API key; missing credentials are fatal at startup.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        if !self.provider.requires_api_key() {
            return Ok(self.provider.api_key.as_deref().unwrap_or_default());
        }
        self.provider
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingCredential("provider.api_key"))
    }

    /// Gateway request timeout, widened so the worst-case cycle (every
    /// attempt hitting the provider timeout) finishes before the layer
    /// drops the handler.
    pub fn gateway_request_timeout_secs(&self) -> u64 {
        let attempts = u64::try_from(self.generation.max_attempts).unwrap_or(u64::MAX);
        let cycle_budget = attempts
            .saturating_mul(self.provider.timeout_secs)
            .saturating_add(CYCLE_TIMEOUT_MARGIN_SECS);
        self.gateway.request_timeout_secs.max(cycle_budget)
    }

    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level
            .parse::<tracing::Level>()
            .unwrap_or(tracing::Level::INFO)
    }
}
