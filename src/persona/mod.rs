//! Weighted selection of writing styles and length targets.

pub mod length;
pub mod style;

pub use length::{LengthBudget, LengthTarget};
pub use style::{StyleCatalog, StyleProfile};

use crate::error::ConfigError;

/// Discrete distribution over `T` backed by cumulative weights.
#[derive(Debug, Clone)]
pub(crate) struct WeightedTable<T> {
    entries: Vec<T>,
    cumulative: Vec<f64>,
}

impl<T> WeightedTable<T> {
    pub(crate) fn new(
        what: &str,
        items: impl IntoIterator<Item = (T, f64)>,
    ) -> Result<Self, ConfigError> {
        let mut entries = Vec::new();
        let mut cumulative = Vec::new();
        let mut total = 0.0;
        for (entry, weight) in items {
            if !weight.is_finite() || weight <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{what} weights must be positive, got {weight}"
                )));
            }
            total += weight;
            entries.push(entry);
            cumulative.push(total);
        }
        if entries.is_empty() {
            return Err(ConfigError::Validation(format!("{what} must not be empty")));
        }
        Ok(Self {
            entries,
            cumulative,
        })
    }

    /// Entry selected by `roll` in `[0, 1)`. Weights need not sum to one.
    pub(crate) fn get_for(&self, roll: f64) -> &T {
        let total = self.cumulative.last().copied().unwrap_or(1.0);
        let target = roll.clamp(0.0, 1.0) * total;
        let index = self
            .cumulative
            .iter()
            .position(|&edge| target < edge)
            .unwrap_or(self.entries.len() - 1);
        &self.entries[index]
    }

    pub(crate) fn pick<R: rand::Rng>(&self, rng: &mut R) -> &T {
        self.get_for(rng.random::<f64>())
    }

    pub(crate) fn entries(&self) -> &[T] {
        &self.entries
    }
}
