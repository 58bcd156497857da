use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Attempts per cycle before the cycle is reported as exhausted.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Percentage; a candidate scoring strictly above this against any
    /// window member is rejected.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    #[serde(default = "default_ngram_size")]
    pub ngram_size: usize,
    /// Most-recent records compared against each candidate.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_min_corpus")]
    pub min_corpus: usize,
    #[serde(default = "default_sample_min")]
    pub sample_min: usize,
    #[serde(default = "default_sample_max")]
    pub sample_max: usize,
    #[serde(default = "default_sample_ratio")]
    pub sample_ratio: f64,
    /// Hard character ceiling applied to every accepted candidate.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_length_buckets")]
    pub length_buckets: Vec<LengthBucketConfig>,
    #[serde(default = "default_styles")]
    pub styles: Vec<StyleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LengthBucketConfig {
    pub name: String,
    pub weight: f64,
    pub min: u32,
    pub max: u32,
    pub generation_budget: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StyleConfig {
    pub persona: String,
    pub tone: String,
    pub style_guide: String,
    pub temperature: f64,
    #[serde(default = "default_style_weight")]
    pub weight: f64,
}

fn default_max_attempts() -> usize {
    5
}

fn default_similarity_threshold() -> f64 {
    35.0
}

fn default_ngram_size() -> usize {
    3
}

fn default_window_size() -> usize {
    150
}

fn default_min_corpus() -> usize {
    3
}

fn default_sample_min() -> usize {
    3
}

fn default_sample_max() -> usize {
    5
}

fn default_sample_ratio() -> f64 {
    0.1
}

fn default_max_chars() -> usize {
    300
}

fn default_style_weight() -> f64 {
    1.0
}

fn bucket(name: &str, weight: f64, min: u32, max: u32, generation_budget: u32) -> LengthBucketConfig {
    LengthBucketConfig {
        name: name.into(),
        weight,
        min,
        max,
        generation_budget,
    }
}

fn default_length_buckets() -> Vec<LengthBucketConfig> {
    vec![
        bucket("short", 0.50, 40, 80, 60),
        bucket("medium", 0.30, 80, 150, 110),
        bucket("long", 0.15, 150, 220, 160),
        bucket("max", 0.05, 220, 300, 220),
    ]
}

fn style(persona: &str, tone: &str, style_guide: &str, temperature: f64, weight: f64) -> StyleConfig {
    StyleConfig {
        persona: persona.into(),
        tone: tone.into(),
        style_guide: style_guide.into(),
        temperature,
        weight,
    }
}

fn default_styles() -> Vec<StyleConfig> {
    vec![
        style(
            "a long-time resident",
            "concise",
            "Short, punchy sentences. No filler words.",
            0.85,
            0.20,
        ),
        style(
            "a parent on the school run",
            "frustrated",
            "Add urgency and frustration without changing the core concern.",
            0.88,
            0.15,
        ),
        style(
            "a retired commuter",
            "measured",
            "Calm and factual. State the problem plainly, with little emotion.",
            0.82,
            0.15,
        ),
        style(
            "an elderly local",
            "weary",
            "Simple language, a nostalgic reference to how the town used to be.",
            0.80,
            0.10,
        ),
        style(
            "a seasonal visitor",
            "sardonic",
            "Dry British sarcasm. Keep the complaint, add subtle humour.",
            0.92,
            0.10,
        ),
        style(
            "a shop owner",
            "personal",
            "First person throughout; describe the impact on your own day.",
            0.87,
            0.15,
        ),
        style(
            "a cyclist",
            "matter-of-fact",
            "A brief observation. State facts without elaboration.",
            0.90,
            0.15,
        ),
    ]
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            similarity_threshold: default_similarity_threshold(),
            ngram_size: default_ngram_size(),
            window_size: default_window_size(),
            min_corpus: default_min_corpus(),
            sample_min: default_sample_min(),
            sample_max: default_sample_max(),
            sample_ratio: default_sample_ratio(),
            max_chars: default_max_chars(),
            length_buckets: default_length_buckets(),
            styles: default_styles(),
        }
    }
}

fn positive_weight(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "generation.max_attempts must be at least 1".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::Validation(format!(
                "generation.similarity_threshold must be within [0, 100], got {}",
                self.similarity_threshold
            )));
        }
        if self.ngram_size == 0 || self.window_size == 0 || self.min_corpus == 0 {
            return Err(ConfigError::Validation(
                "generation.ngram_size, window_size and min_corpus must be positive".into(),
            ));
        }
        if self.sample_min == 0 || self.sample_min > self.sample_max {
            return Err(ConfigError::Validation(format!(
                "generation.sample_min ({}) must be in 1..=sample_max ({})",
                self.sample_min, self.sample_max
            )));
        }
        if self.max_chars == 0 {
            return Err(ConfigError::Validation(
                "generation.max_chars must be positive".into(),
            ));
        }

        if self.length_buckets.is_empty() {
            return Err(ConfigError::Validation(
                "generation.length_buckets must not be empty".into(),
            ));
        }
        for bucket in &self.length_buckets {
            if bucket.min >= bucket.max {
                return Err(ConfigError::Validation(format!(
                    "length bucket '{}' requires min < max ({} >= {})",
                    bucket.name, bucket.min, bucket.max
                )));
            }
            if !positive_weight(bucket.weight) || bucket.generation_budget == 0 {
                return Err(ConfigError::Validation(format!(
                    "length bucket '{}' needs a positive weight and generation budget",
                    bucket.name
                )));
            }
        }

        if self.styles.is_empty() {
            return Err(ConfigError::Validation(
                "generation.styles must not be empty".into(),
            ));
        }
        for style in &self.styles {
            if !(0.0..=1.0).contains(&style.temperature) {
                return Err(ConfigError::Validation(format!(
                    "style '{}' temperature must be within [0, 1]",
                    style.persona
                )));
            }
            if !positive_weight(style.weight) {
                return Err(ConfigError::Validation(format!(
                    "style '{}' needs a positive weight",
                    style.persona
                )));
            }
        }

        Ok(())
    }
}
