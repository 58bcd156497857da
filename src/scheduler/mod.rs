//! Time-of-day weighted scheduling loop around the generation pipeline.

pub mod clock;
pub mod policy;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use state::{CycleReport, ScheduleState};

use crate::config::SchedulerConfig;
use crate::error::{ConfigError, CycleError};
use crate::generation::{CycleOutcome, GenerationCycleResult, GenerationPipeline};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Anything that can run one generation cycle.
#[async_trait]
pub trait CycleRunner: Send + Sync {
    async fn run_cycle(&self) -> Result<GenerationCycleResult, CycleError>;
}

#[async_trait]
impl CycleRunner for GenerationPipeline {
    async fn run_cycle(&self) -> Result<GenerationCycleResult, CycleError> {
        GenerationPipeline::run_cycle(self).await
    }
}

/// Result of one pass through the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Outside active hours; slept until the window opens.
    SleptUntilActive(Duration),
    /// Ran a cycle, then waited `next_interval`.
    Cycle {
        report: CycleReport,
        next_interval: Duration,
    },
    Cancelled,
}

pub struct Scheduler {
    config: SchedulerConfig,
    runner: Arc<dyn CycleRunner>,
    clock: Arc<dyn Clock>,
    state: ScheduleState,
    rng: StdRng,
}

impl Scheduler {
    pub fn new(
        config: SchedulerConfig,
        runner: Arc<dyn CycleRunner>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: ScheduleState::new(&config),
            config,
            runner,
            clock,
            rng: StdRng::from_rng(&mut rand::rng()),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &ScheduleState {
        &self.state
    }

    /// Loop until `cancel` fires. Returns the final state.
    pub async fn run(mut self, cancel: CancellationToken) -> ScheduleState {
        tracing::info!(
            active_start = self.state.active_start_hour,
            active_end = self.state.active_end_hour,
            min_interval_minutes = self.config.min_interval_minutes,
            max_interval_minutes = self.config.max_interval_minutes,
            "scheduler started"
        );

        while !cancel.is_cancelled() {
            if self.step(&cancel).await == Step::Cancelled {
                break;
            }
        }

        tracing::info!(
            cycles = self.state.cycles,
            accepted = self.state.accepted,
            "scheduler stopped"
        );
        self.state
    }

    /// Sleep to the active window, or run one cycle and wait out the next
    /// interval.
    pub async fn step(&mut self, cancel: &CancellationToken) -> Step {
        if cancel.is_cancelled() {
            return Step::Cancelled;
        }

        let now = self.clock.now();
        let until_active = policy::until_active_window(now, &self.config);
        if !until_active.is_zero() {
            let wake_at = now + to_chrono(until_active);
            self.state.next_wake = Some(wake_at);
            tracing::info!(
                %wake_at,
                hours = until_active.as_secs_f64() / 3600.0,
                "outside active hours, sleeping"
            );
            if !self.sleep(until_active, cancel).await {
                return Step::Cancelled;
            }
            return Step::SleptUntilActive(until_active);
        }

        let report = self.run_with_retries(cancel).await;
        if report == CycleReport::Cancelled {
            return Step::Cancelled;
        }
        self.state.record(&report);

        let next_interval = self.next_interval(&report);
        let now = self.clock.now();
        self.state.next_wake = Some(now + to_chrono(next_interval));
        tracing::info!(
            minutes = next_interval.as_secs_f64() / 60.0,
            cooling_off = self.state.cooling_off,
            "next generation scheduled"
        );

        self.sleep(next_interval, cancel).await;
        Step::Cycle {
            report,
            next_interval,
        }
    }

    /// Run a cycle, retrying provider failures with exponential backoff up
    /// to the configured ceiling.
    async fn run_with_retries(&self, cancel: &CancellationToken) -> CycleReport {
        let ceiling = self.config.provider_retries.max(1);
        let mut last_error = String::new();

        for retry in 0..ceiling {
            if cancel.is_cancelled() {
                return CycleReport::Cancelled;
            }

            match self.runner.run_cycle().await {
                Ok(result) => {
                    let attempts = result.attempts.len();
                    return match result.outcome {
                        CycleOutcome::Accepted { .. } => CycleReport::Accepted { attempts },
                        CycleOutcome::Exhausted => CycleReport::Exhausted { attempts },
                    };
                }
                Err(error) if error.is_provider() => {
                    let delay = policy::backoff_delay(self.config.backoff_base_ms, retry);
                    tracing::warn!(
                        %error,
                        try_number = retry + 1,
                        ceiling,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "provider failure, backing off"
                    );
                    last_error = error.to_string();
                    if !self.sleep(delay, cancel).await {
                        return CycleReport::Cancelled;
                    }
                }
                Err(error) => {
                    tracing::warn!(kind = error.kind(), %error, "generation cycle failed");
                    return CycleReport::Failed {
                        kind: error.kind(),
                        message: error.to_string(),
                    };
                }
            }
        }

        tracing::error!(tries = ceiling, "provider retries exhausted, giving up this cycle");
        CycleReport::ProviderFailed {
            tries: ceiling,
            last_error,
        }
    }

    fn next_interval(&mut self, report: &CycleReport) -> Duration {
        let min = policy::u64_to_f64(self.config.min_interval_minutes);
        let max = policy::u64_to_f64(self.config.max_interval_minutes);
        let base_minutes = self.rng.random_range(min..=max);
        let interval =
            policy::weighted_interval(base_minutes, self.clock.now().hour(), &self.config);

        if matches!(report, CycleReport::Exhausted { .. }) {
            policy::extended_interval(interval, &self.config)
        } else {
            interval
        }
    }

    /// Returns false when cancelled before the delay elapsed.
    async fn sleep(&self, duration: Duration, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        tokio::select! {
            biased;
            () = cancel.cancelled() => false,
            () = self.clock.sleep(duration) => true,
        }
    }
}

fn to_chrono(duration: Duration) -> ChronoDuration {
    ChronoDuration::from_std(duration).unwrap_or(ChronoDuration::MAX)
}
