use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Wall-clock source and sleep primitive for the scheduler loop.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Deterministic clock: sleeping returns at once and advances `now`.
///
/// Every requested sleep is recorded. Optionally cancels a token once a
/// given number of sleeps has happened, so a scheduler loop can be run to a
/// known point.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
    sleeps: Mutex<Vec<Duration>>,
    stop: Option<(usize, CancellationToken)>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(start),
            sleeps: Mutex::new(Vec::new()),
            stop: None,
        }
    }

    pub fn cancel_after(mut self, sleeps: usize, token: CancellationToken) -> Self {
        self.stop = Some((sleeps, token));
        self
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += chrono::Duration::from_std(by).unwrap_or(chrono::Duration::MAX);
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn sleep(&self, duration: Duration) {
        self.advance(duration);
        let recorded = {
            let mut sleeps = self.sleeps.lock().unwrap_or_else(PoisonError::into_inner);
            sleeps.push(duration);
            sleeps.len()
        };
        if let Some((limit, token)) = &self.stop
            && recorded >= *limit
        {
            token.cancel();
        }
    }
}
