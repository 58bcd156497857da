use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let synthlead_dir = home.join(".synthlead");

        if !synthlead_dir.exists() {
            fs::create_dir_all(&synthlead_dir)
                .context("Failed to create .synthlead directory")?;
            fs::create_dir_all(synthlead_dir.join("workspace"))
                .context("Failed to create workspace directory")?;
        }

        let mut config = Self::load_from(&synthlead_dir.join("config.toml"))?;
        config.workspace_dir = synthlead_dir.join("workspace");
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Read `config_path`, writing a default file first when it does not exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let contents =
                fs::read_to_string(config_path).context("Failed to read config file")?;
            let mut config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            config.config_path = config_path.to_path_buf();
            if let Some(parent) = config_path.parent() {
                config.workspace_dir = parent.join("workspace");
            }
            Ok(config)
        } else {
            let mut config = Self {
                config_path: config_path.to_path_buf(),
                ..Self::default()
            };
            if let Some(parent) = config_path.parent() {
                config.workspace_dir = parent.join("workspace");
            }
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}
