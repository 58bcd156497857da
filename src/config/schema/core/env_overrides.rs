use super::Config;
use std::path::PathBuf;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("SYNTHLEAD_API_KEY")
            .or_else(|_| std::env::var("ANTHROPIC_API_KEY"))
            && !key.is_empty()
        {
            self.provider.api_key = Some(key);
        }

        if let Ok(provider) = std::env::var("SYNTHLEAD_PROVIDER")
            && !provider.is_empty()
        {
            self.provider.name = provider;
        }

        if let Ok(model) = std::env::var("SYNTHLEAD_MODEL")
            && !model.is_empty()
        {
            self.provider.model = model;
        }

        if let Ok(secret) =
            std::env::var("SYNTHLEAD_ADMIN_SECRET").or_else(|_| std::env::var("ADMIN_SECRET"))
            && !secret.is_empty()
        {
            self.gateway.admin_secret = Some(secret);
        }

        if let Ok(path) =
            std::env::var("SYNTHLEAD_DATABASE_PATH").or_else(|_| std::env::var("DATABASE_PATH"))
            && !path.is_empty()
        {
            self.store.path = Some(path);
        }

        if let Ok(workspace) = std::env::var("SYNTHLEAD_WORKSPACE")
            && !workspace.is_empty()
        {
            self.workspace_dir = PathBuf::from(workspace);
        }

        if let Ok(port_str) = std::env::var("SYNTHLEAD_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(threshold_str) = std::env::var("SYNTHLEAD_SIMILARITY_THRESHOLD")
            && let Ok(threshold) = threshold_str.parse::<f64>()
            && (0.0..=100.0).contains(&threshold)
        {
            self.generation.similarity_threshold = threshold;
        }

        if let Ok(level) = std::env::var("SYNTHLEAD_LOG")
            && !level.is_empty()
        {
            self.log_level = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::core::test_env::EnvScope;

    #[test]
    fn env_overrides_replace_credentials_and_secret() {
        let mut env = EnvScope::new();
        env.set("SYNTHLEAD_API_KEY", "sk-env")
            .set("SYNTHLEAD_ADMIN_SECRET", "admin-env")
            .unset("SYNTHLEAD_DATABASE_PATH")
            .unset("DATABASE_PATH");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.provider.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.gateway.admin_secret.as_deref(), Some("admin-env"));
        assert_eq!(config.store.path, None);
    }

    #[test]
    fn env_overrides_fall_back_to_unprefixed_names() {
        let mut env = EnvScope::new();
        env.unset("SYNTHLEAD_API_KEY")
            .set("ANTHROPIC_API_KEY", "sk-ant-fallback")
            .unset("SYNTHLEAD_ADMIN_SECRET")
            .set("ADMIN_SECRET", "fallback-secret");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.provider.api_key.as_deref(), Some("sk-ant-fallback"));
        assert_eq!(
            config.gateway.admin_secret.as_deref(),
            Some("fallback-secret")
        );
    }

    #[test]
    fn out_of_range_threshold_override_is_ignored() {
        let mut env = EnvScope::new();
        env.set("SYNTHLEAD_SIMILARITY_THRESHOLD", "140");

        let mut config = Config::default();
        let before = config.generation.similarity_threshold;
        config.apply_env_overrides();

        assert!((config.generation.similarity_threshold - before).abs() < f64::EPSILON);
    }

    #[test]
    fn threshold_override_applies_when_in_range() {
        let mut env = EnvScope::new();
        env.set("SYNTHLEAD_SIMILARITY_THRESHOLD", "25");

        let mut config = Config::default();
        config.apply_env_overrides();

        assert!((config.generation.similarity_threshold - 25.0).abs() < f64::EPSILON);
    }
}
