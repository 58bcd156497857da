//! Bounded generate-and-score loop for a single cycle.

use super::generator::ContentGenerator;
use super::types::GenerationAttempt;
use crate::config::GenerationConfig;
use crate::corpus::HistoricalRecord;
use crate::error::ProviderError;
use crate::persona::{LengthBudget, StyleCatalog};
use crate::similarity;
use rand::Rng;
use rand::seq::IndexedRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum GateState {
    Sampling,
    Generating,
    Scoring,
    Accepted,
    Retrying,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    /// Accepted candidate text, `None` when the gate exhausted its attempts.
    pub accepted: Option<String>,
    pub attempts: Vec<GenerationAttempt>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateSettings {
    pub max_attempts: usize,
    pub threshold: f64,
    pub ngram_size: usize,
}

impl From<&GenerationConfig> for GateSettings {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            threshold: config.similarity_threshold,
            ngram_size: config.ngram_size,
        }
    }
}

pub struct UniquenessGate<'a> {
    generator: &'a dyn ContentGenerator,
    styles: &'a StyleCatalog,
    lengths: &'a LengthBudget,
    settings: GateSettings,
}

impl<'a> UniquenessGate<'a> {
    pub fn new(
        generator: &'a dyn ContentGenerator,
        styles: &'a StyleCatalog,
        lengths: &'a LengthBudget,
        settings: GateSettings,
    ) -> Self {
        Self {
            generator,
            styles,
            lengths,
            settings,
        }
    }

    /// Run attempts until one candidate clears the threshold against
    /// `window` or the attempt budget runs out.
    ///
    /// Each attempt redraws `sample_size` examples from `pool` plus a fresh
    /// style and length. A provider error ends the run immediately and does
    /// not count as an attempt.
    pub async fn run<R: Rng + Send>(
        &self,
        pool: &[HistoricalRecord],
        sample_size: usize,
        window: &[HistoricalRecord],
        rng: &mut R,
    ) -> Result<GateOutcome, ProviderError> {
        let window_texts: Vec<&str> = window.iter().map(|r| r.text.as_str()).collect();
        let mut attempts = Vec::with_capacity(self.settings.max_attempts);

        for attempt_number in 1..=self.settings.max_attempts {
            tracing::debug!(attempt = attempt_number, state = %GateState::Sampling, "gate transition");
            let examples: Vec<HistoricalRecord> = pool
                .choose_multiple(rng, sample_size)
                .cloned()
                .collect();
            let style = self.styles.pick(rng);
            let length = self.lengths.pick(rng);

            tracing::debug!(
                attempt = attempt_number,
                state = %GateState::Generating,
                style = %style.persona,
                length = %length.name,
                examples = examples.len(),
                "gate transition"
            );
            let candidate = self.generator.generate(&examples, &style, &length).await?;

            tracing::debug!(attempt = attempt_number, state = %GateState::Scoring, "gate transition");
            let report = similarity::is_unique(
                &candidate,
                &window_texts,
                self.settings.threshold,
                self.settings.ngram_size,
            );

            attempts.push(GenerationAttempt {
                attempt_number,
                candidate_text: candidate.clone(),
                similarity_score: report.max_similarity,
                accepted: report.unique,
                closest_match: report.closest_match,
                style: style.persona,
                length_bucket: length.name,
            });

            if report.unique {
                tracing::info!(
                    attempt = attempt_number,
                    score = report.max_similarity,
                    chars = candidate.chars().count(),
                    state = %GateState::Accepted,
                    "candidate accepted"
                );
                return Ok(GateOutcome {
                    accepted: Some(candidate),
                    attempts,
                });
            }

            let next_state = if attempt_number < self.settings.max_attempts {
                GateState::Retrying
            } else {
                GateState::Exhausted
            };
            tracing::info!(
                attempt = attempt_number,
                max_attempts = self.settings.max_attempts,
                score = report.max_similarity,
                threshold = self.settings.threshold,
                state = %next_state,
                "candidate too similar to recent corpus"
            );
        }

        Ok(GateOutcome {
            accepted: None,
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Category;
    use crate::persona::{LengthTarget, StyleProfile};
    use async_trait::async_trait;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct Scripted {
        replies: Mutex<VecDeque<Result<String, ProviderError>>>,
        calls: Mutex<Vec<(Vec<String>, String, String)>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ContentGenerator for Scripted {
        async fn generate(
            &self,
            examples: &[HistoricalRecord],
            style: &StyleProfile,
            length: &LengthTarget,
        ) -> Result<String, ProviderError> {
            self.calls.lock().unwrap().push((
                examples.iter().map(|e| e.text.clone()).collect(),
                style.persona.clone(),
                length.name.clone(),
            ));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok("Traffic is terrible on Station Road".into()))
        }
    }

    fn corpus() -> Vec<HistoricalRecord> {
        [
            "Traffic is terrible on Station Road",
            "The gridlock near the school is awful",
            "Parking has become impossible downtown",
            "Lorries thunder through the high street",
            "Nowhere to cross safely by the pier",
            "Weekend queues stretch past the quay",
        ]
        .into_iter()
        .map(|t| HistoricalRecord::human(t, Category::Local, Utc::now()))
        .collect()
    }

    fn catalogs() -> (StyleCatalog, LengthBudget) {
        let config = GenerationConfig::default();
        (
            StyleCatalog::from_config(&config.styles).unwrap(),
            LengthBudget::from_config(&config.length_buckets).unwrap(),
        )
    }

    fn settings(max_attempts: usize) -> GateSettings {
        GateSettings {
            max_attempts,
            threshold: 35.0,
            ngram_size: 3,
        }
    }

    #[tokio::test]
    async fn first_unique_candidate_is_accepted() {
        let generator = Scripted::new(vec![Ok(
            "The standstill by the high street is unbearable".into()
        )]);
        let (styles, lengths) = catalogs();
        let gate = UniquenessGate::new(&generator, &styles, &lengths, settings(5));
        let corpus = corpus();

        let outcome = gate
            .run(&corpus, 3, &corpus, &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();

        assert_eq!(
            outcome.accepted.as_deref(),
            Some("The standstill by the high street is unbearable")
        );
        assert_eq!(outcome.attempts.len(), 1);
        assert!(outcome.attempts[0].accepted);
        assert!(outcome.attempts[0].similarity_score <= 35.0);
    }

    #[tokio::test]
    async fn duplicates_exhaust_after_max_attempts() {
        let generator = Scripted::new(Vec::new());
        let (styles, lengths) = catalogs();
        let gate = UniquenessGate::new(&generator, &styles, &lengths, settings(5));
        let corpus = corpus();

        let outcome = gate
            .run(&corpus, 3, &corpus, &mut StdRng::seed_from_u64(2))
            .await
            .unwrap();

        assert_eq!(outcome.accepted, None);
        assert_eq!(outcome.attempts.len(), 5);
        for (idx, attempt) in outcome.attempts.iter().enumerate() {
            assert_eq!(attempt.attempt_number, idx + 1);
            assert!(!attempt.accepted);
            assert!((attempt.similarity_score - 100.0).abs() < f64::EPSILON);
        }
    }

    #[tokio::test]
    async fn retries_redraw_examples_and_style() {
        let generator = Scripted::new(Vec::new());
        let (styles, lengths) = catalogs();
        let gate = UniquenessGate::new(&generator, &styles, &lengths, settings(5));
        let corpus = corpus();

        gate.run(&corpus, 3, &corpus, &mut StdRng::seed_from_u64(3))
            .await
            .unwrap();

        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 5);
        let distinct: std::collections::HashSet<_> = calls.iter().collect();
        assert!(distinct.len() > 1, "every attempt reused the same parameters");
        for (examples, _, _) in calls.iter() {
            assert_eq!(examples.len(), 3);
        }
    }

    #[tokio::test]
    async fn provider_error_aborts_without_consuming_an_attempt() {
        let generator = Scripted::new(vec![
            Ok("Traffic is terrible on Station Road".into()),
            Err(ProviderError::Transport {
                provider: "stub".into(),
                message: "connection reset".into(),
            }),
        ]);
        let (styles, lengths) = catalogs();
        let gate = UniquenessGate::new(&generator, &styles, &lengths, settings(5));
        let corpus = corpus();

        let err = gate
            .run(&corpus, 3, &corpus, &mut StdRng::seed_from_u64(4))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Transport { .. }));
        assert_eq!(generator.calls.lock().unwrap().len(), 2);
    }
}
