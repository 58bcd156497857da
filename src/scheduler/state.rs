use crate::config::SchedulerConfig;
use chrono::NaiveDateTime;
use serde::Serialize;

/// How a scheduled cycle ended, after provider retries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CycleReport {
    Accepted { attempts: usize },
    Exhausted { attempts: usize },
    /// Every retry hit a provider error.
    ProviderFailed { tries: u32, last_error: String },
    /// Insufficient corpus, persistence failure, busy, ...
    Failed { kind: &'static str, message: String },
    /// Stop requested during a backoff delay.
    Cancelled,
}

/// In-memory scheduler state; rebuilt from configuration on every start.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScheduleState {
    /// Active window `[start, end)` in local hours.
    pub active_start_hour: u32,
    pub active_end_hour: u32,
    pub next_wake: Option<NaiveDateTime>,
    /// Set after an exhausted cycle, cleared by the next accepted one.
    pub cooling_off: bool,
    pub cycles: u64,
    pub accepted: u64,
    pub exhausted: u64,
    pub failed: u64,
    pub last_report: Option<CycleReport>,
}

impl ScheduleState {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            active_start_hour: config.active_start_hour,
            active_end_hour: config.active_end_hour,
            ..Self::default()
        }
    }

    pub fn record(&mut self, report: &CycleReport) {
        match report {
            CycleReport::Accepted { .. } => {
                self.accepted += 1;
                self.cooling_off = false;
            }
            CycleReport::Exhausted { .. } => {
                self.exhausted += 1;
                self.cooling_off = true;
            }
            CycleReport::ProviderFailed { .. } | CycleReport::Failed { .. } => self.failed += 1,
            CycleReport::Cancelled => return,
        }
        self.cycles += 1;
        self.last_report = Some(report.clone());
    }
}
