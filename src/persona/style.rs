use super::WeightedTable;
use crate::config::StyleConfig;
use crate::error::ConfigError;
use serde::Serialize;

/// Voice the provider is asked to write in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleProfile {
    pub persona: String,
    pub tone: String,
    pub style_guide: String,
    /// Sampling temperature in `[0, 1]`.
    pub temperature: f64,
}

impl From<&StyleConfig> for StyleProfile {
    fn from(config: &StyleConfig) -> Self {
        Self {
            persona: config.persona.clone(),
            tone: config.tone.clone(),
            style_guide: config.style_guide.clone(),
            temperature: config.temperature.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StyleCatalog {
    table: WeightedTable<StyleProfile>,
}

impl StyleCatalog {
    pub fn from_config(styles: &[StyleConfig]) -> Result<Self, ConfigError> {
        let table = WeightedTable::new(
            "generation.styles",
            styles.iter().map(|s| (StyleProfile::from(s), s.weight)),
        )?;
        Ok(Self { table })
    }

    pub fn pick<R: rand::Rng>(&self, rng: &mut R) -> StyleProfile {
        self.table.pick(rng).clone()
    }

    pub fn style_for(&self, roll: f64) -> &StyleProfile {
        self.table.get_for(roll)
    }

    pub fn styles(&self) -> &[StyleProfile] {
        self.table.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn default_catalog() -> StyleCatalog {
        StyleCatalog::from_config(&GenerationConfig::default().styles).unwrap()
    }

    #[test]
    fn default_catalog_has_seven_voices_with_sane_temperatures() {
        let catalog = default_catalog();
        assert_eq!(catalog.styles().len(), 7);
        for style in catalog.styles() {
            assert!((0.8..=0.92).contains(&style.temperature), "{style:?}");
        }
    }

    #[test]
    fn every_style_is_reachable() {
        let catalog = default_catalog();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = HashMap::new();
        for _ in 0..5_000 {
            *seen.entry(catalog.pick(&mut rng).persona).or_insert(0u32) += 1;
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn frequencies_track_weights_over_many_draws() {
        let styles = GenerationConfig::default().styles;
        let catalog = StyleCatalog::from_config(&styles).unwrap();
        let total: f64 = styles.iter().map(|s| s.weight).sum();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<String, u32> = HashMap::new();
        let draws = 10_000;
        for _ in 0..draws {
            *counts.entry(catalog.pick(&mut rng).persona).or_insert(0) += 1;
        }

        for style in &styles {
            let expected = style.weight / total;
            let observed =
                f64::from(counts.get(&style.persona).copied().unwrap_or(0)) / f64::from(draws);
            assert!(
                (observed - expected).abs() < 0.02,
                "{}: observed {observed}, expected {expected}",
                style.persona
            );
        }
    }

    #[test]
    fn low_roll_selects_first_style() {
        let catalog = default_catalog();
        assert_eq!(catalog.style_for(0.0).tone, "concise");
        assert_eq!(catalog.style_for(0.99).tone, "matter-of-fact");
    }
}
