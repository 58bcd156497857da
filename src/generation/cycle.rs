use super::gate::{GateSettings, UniquenessGate};
use super::generator::ContentGenerator;
use super::records::RecordFactory;
use super::types::{CycleOutcome, GenerationCycleResult};
use crate::config::GenerationConfig;
use crate::corpus::{
    CorpusReader, HistoricalRecord, RecordSink, SourceKind, category_distribution,
};
use crate::error::{ConfigError, CycleError};
use crate::persona::{LengthBudget, StyleCatalog};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex, PoisonError};

/// One end-to-end cycle: read the window, run the gate, build and commit
/// the record.
pub struct GenerationPipeline {
    reader: Arc<dyn CorpusReader>,
    /// `None` runs the pipeline dry.
    sink: Option<Arc<dyn RecordSink>>,
    generator: Arc<dyn ContentGenerator>,
    styles: StyleCatalog,
    lengths: LengthBudget,
    factory: RecordFactory,
    config: GenerationConfig,
    seed_source: Mutex<StdRng>,
    cycle_lock: tokio::sync::Mutex<()>,
}

impl GenerationPipeline {
    pub fn new(
        config: GenerationConfig,
        reader: Arc<dyn CorpusReader>,
        sink: Option<Arc<dyn RecordSink>>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            styles: StyleCatalog::from_config(&config.styles)?,
            lengths: LengthBudget::from_config(&config.length_buckets)?,
            factory: RecordFactory::default(),
            reader,
            sink,
            generator,
            config,
            seed_source: Mutex::new(StdRng::from_rng(&mut rand::rng())),
            cycle_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Make every draw reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed_source: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.sink.is_none()
    }

    pub fn is_busy(&self) -> bool {
        self.cycle_lock.try_lock().is_err()
    }

    /// Example count for a usable corpus of `available` records.
    pub fn sample_size(&self, available: usize) -> usize {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let proportional = (available as f64 * self.config.sample_ratio).floor() as usize;
        proportional
            .clamp(self.config.sample_min, self.config.sample_max)
            .min(available)
    }

    fn cycle_rng(&self) -> StdRng {
        let mut source = self
            .seed_source
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        StdRng::from_rng(&mut *source)
    }

    /// Run one cycle. Only one cycle runs at a time; a concurrent call gets
    /// [`CycleError::Busy`].
    pub async fn run_cycle(&self) -> Result<GenerationCycleResult, CycleError> {
        let _guard = self.cycle_lock.try_lock().map_err(|_| CycleError::Busy)?;
        let mut rng = self.cycle_rng();

        let window: Vec<HistoricalRecord> = self
            .reader
            .fetch_recent(self.config.window_size)
            .await
            .map_err(CycleError::Corpus)?
            .into_iter()
            .filter(HistoricalRecord::has_text)
            .collect();

        if window.len() < self.config.min_corpus {
            tracing::warn!(
                found = window.len(),
                required = self.config.min_corpus,
                "not enough records with text to generate from"
            );
            return Err(CycleError::InsufficientCorpus {
                found: window.len(),
                required: self.config.min_corpus,
            });
        }

        let sample_size = self.sample_size(window.len());
        let human: Vec<HistoricalRecord> = window
            .iter()
            .filter(|r| r.source_kind == SourceKind::Human)
            .cloned()
            .collect();
        let pool = if human.len() >= sample_size {
            human
        } else {
            window.clone()
        };

        tracing::info!(
            window = window.len(),
            pool = pool.len(),
            sample_size,
            dry_run = self.is_dry_run(),
            "starting generation cycle"
        );

        let gate = UniquenessGate::new(
            self.generator.as_ref(),
            &self.styles,
            &self.lengths,
            GateSettings::from(&self.config),
        );
        let outcome = gate.run(&pool, sample_size, &window, &mut rng).await?;

        let Some(text) = outcome.accepted else {
            tracing::warn!(
                attempts = outcome.attempts.len(),
                "uniqueness gate exhausted its attempts"
            );
            return Ok(GenerationCycleResult {
                outcome: CycleOutcome::Exhausted,
                attempts: outcome.attempts,
            });
        };

        let distribution = category_distribution(&window);
        let record = self
            .factory
            .synthesize(&text, &distribution, Utc::now(), &mut rng);

        let record_id = match &self.sink {
            Some(sink) => {
                let id = sink.commit(&record).await.map_err(CycleError::Persistence)?;
                tracing::info!(
                    record_id = %id,
                    name = %record.identity.display_name(),
                    category = %record.record.category,
                    chars = record.record.char_len(),
                    "synthetic record committed"
                );
                Some(id)
            }
            None => {
                tracing::info!(
                    name = %record.identity.display_name(),
                    category = %record.record.category,
                    "dry run: record not committed"
                );
                None
            }
        };

        Ok(GenerationCycleResult {
            outcome: CycleOutcome::Accepted { record, record_id },
            attempts: outcome.attempts,
        })
    }
}
