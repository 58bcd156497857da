use super::WeightedTable;
use crate::config::LengthBucketConfig;
use crate::error::ConfigError;
use serde::Serialize;

/// Soft character range for a candidate plus the provider output budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LengthTarget {
    pub name: String,
    pub min: u32,
    pub max: u32,
    /// Max output tokens requested from the provider.
    pub generation_budget: u32,
}

#[derive(Debug, Clone)]
pub struct LengthBudget {
    table: WeightedTable<LengthTarget>,
}

impl LengthBudget {
    pub fn from_config(buckets: &[LengthBucketConfig]) -> Result<Self, ConfigError> {
        for bucket in buckets {
            if bucket.min >= bucket.max {
                return Err(ConfigError::Validation(format!(
                    "length bucket '{}' requires min < max",
                    bucket.name
                )));
            }
        }
        let table = WeightedTable::new(
            "generation.length_buckets",
            buckets.iter().map(|b| {
                (
                    LengthTarget {
                        name: b.name.clone(),
                        min: b.min,
                        max: b.max,
                        generation_budget: b.generation_budget,
                    },
                    b.weight,
                )
            }),
        )?;
        Ok(Self { table })
    }

    pub fn pick<R: rand::Rng>(&self, rng: &mut R) -> LengthTarget {
        self.table.pick(rng).clone()
    }

    /// Bucket chosen for a roll in `[0, 1)`.
    pub fn bucket_for(&self, roll: f64) -> &LengthTarget {
        self.table.get_for(roll)
    }

    pub fn targets(&self) -> &[LengthTarget] {
        self.table.entries()
    }
}
