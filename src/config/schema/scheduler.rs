use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// First active hour (inclusive, local time).
    #[serde(default = "default_active_start_hour")]
    pub active_start_hour: u32,
    /// End of the active window (exclusive, local time).
    #[serde(default = "default_active_end_hour")]
    pub active_end_hour: u32,
    #[serde(default = "default_min_interval_minutes")]
    pub min_interval_minutes: u64,
    #[serde(default = "default_max_interval_minutes")]
    pub max_interval_minutes: u64,
    #[serde(default = "default_peak_bands")]
    pub peak_bands: Vec<PeakBandConfig>,
    /// Cycle attempts allowed when the provider keeps failing.
    #[serde(default = "default_provider_retries")]
    pub provider_retries: u32,
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
    /// Multiplier applied to the next interval after uniqueness exhaustion.
    #[serde(default = "default_exhaustion_extension")]
    pub exhaustion_extension: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeakBandConfig {
    pub name: String,
    pub start_hour: u32,
    pub end_hour: u32,
    pub weight: f64,
}

fn default_active_start_hour() -> u32 {
    8
}

fn default_active_end_hour() -> u32 {
    22
}

fn default_min_interval_minutes() -> u64 {
    45
}

fn default_max_interval_minutes() -> u64 {
    180
}

fn default_provider_retries() -> u32 {
    3
}

fn default_backoff_base_ms() -> u64 {
    30_000
}

fn default_exhaustion_extension() -> f64 {
    1.5
}

fn band(name: &str, start_hour: u32, end_hour: u32, weight: f64) -> PeakBandConfig {
    PeakBandConfig {
        name: name.into(),
        start_hour,
        end_hour,
        weight,
    }
}

fn default_peak_bands() -> Vec<PeakBandConfig> {
    vec![
        band("morning", 8, 11, 1.5),
        band("lunch", 12, 14, 1.8),
        band("afternoon", 15, 17, 1.2),
        band("evening", 18, 21, 1.6),
    ]
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            active_start_hour: default_active_start_hour(),
            active_end_hour: default_active_end_hour(),
            min_interval_minutes: default_min_interval_minutes(),
            max_interval_minutes: default_max_interval_minutes(),
            peak_bands: default_peak_bands(),
            provider_retries: default_provider_retries(),
            backoff_base_ms: default_backoff_base_ms(),
            exhaustion_extension: default_exhaustion_extension(),
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.active_start_hour >= self.active_end_hour || self.active_end_hour > 24 {
            return Err(ConfigError::Validation(format!(
                "scheduler active window {}..{} must satisfy start < end <= 24",
                self.active_start_hour, self.active_end_hour
            )));
        }
        if self.min_interval_minutes == 0 || self.min_interval_minutes > self.max_interval_minutes
        {
            return Err(ConfigError::Validation(format!(
                "scheduler interval range {}..{} minutes is invalid",
                self.min_interval_minutes, self.max_interval_minutes
            )));
        }
        if self.provider_retries == 0 {
            return Err(ConfigError::Validation(
                "scheduler.provider_retries must be at least 1".into(),
            ));
        }
        if !self.exhaustion_extension.is_finite() || self.exhaustion_extension < 1.0 {
            return Err(ConfigError::Validation(
                "scheduler.exhaustion_extension must be >= 1.0".into(),
            ));
        }
        for band in &self.peak_bands {
            if band.start_hour >= band.end_hour || band.end_hour > 24 {
                return Err(ConfigError::Validation(format!(
                    "peak band '{}' must satisfy start < end <= 24",
                    band.name
                )));
            }
            if !band.weight.is_finite() || band.weight <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "peak band '{}' needs a positive weight",
                    band.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        SchedulerConfig::default().validate().unwrap();
    }

    #[test]
    fn inverted_window_is_rejected() {
        let config = SchedulerConfig {
            active_start_hour: 22,
            active_end_hour: 8,
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn shrinking_extension_is_rejected() {
        let config = SchedulerConfig {
            exhaustion_extension: 0.5,
            ..SchedulerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_weight_band_is_rejected() {
        let mut config = SchedulerConfig::default();
        config.peak_bands[0].weight = 0.0;
        assert!(config.validate().is_err());
    }
}
