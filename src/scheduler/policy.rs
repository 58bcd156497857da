//! Pure timing rules: active window, peak weighting, backoff.

use crate::config::{PeakBandConfig, SchedulerConfig};
use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime, Timelike};
use std::time::Duration;

pub fn is_active_hour(hour: u32, config: &SchedulerConfig) -> bool {
    (config.active_start_hour..config.active_end_hour).contains(&hour)
}

/// Exact delay until the next active-window start; zero inside the window.
pub fn until_active_window(now: NaiveDateTime, config: &SchedulerConfig) -> Duration {
    let hour = now.hour();
    if is_active_hour(hour, config) {
        return Duration::ZERO;
    }

    let start = NaiveTime::from_hms_opt(config.active_start_hour, 0, 0).unwrap_or(NaiveTime::MIN);
    let day = if hour >= config.active_end_hour {
        now.date() + ChronoDuration::days(1)
    } else {
        now.date()
    };
    (day.and_time(start) - now).to_std().unwrap_or(Duration::ZERO)
}

/// Multiplier of the first band containing `hour`, 1.0 outside every band.
pub fn peak_weight(hour: u32, bands: &[PeakBandConfig]) -> f64 {
    bands
        .iter()
        .find(|band| (band.start_hour..band.end_hour).contains(&hour))
        .map_or(1.0, |band| band.weight)
}

/// `base_minutes / peak_weight(hour)` as a duration.
pub fn weighted_interval(base_minutes: f64, hour: u32, config: &SchedulerConfig) -> Duration {
    let weight = peak_weight(hour, &config.peak_bands);
    minutes(base_minutes / weight)
}

/// Interval after an exhausted cycle: extended, but never past the maximum.
pub fn extended_interval(interval: Duration, config: &SchedulerConfig) -> Duration {
    let max = minutes(u64_to_f64(config.max_interval_minutes));
    interval.mul_f64(config.exhaustion_extension).min(max)
}

/// `base * 2^retry`.
pub fn backoff_delay(base_ms: u64, retry: u32) -> Duration {
    let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor))
}

pub fn minutes(value: f64) -> Duration {
    Duration::from_secs_f64((value * 60.0).max(0.0))
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn u64_to_f64(value: u64) -> f64 {
    value as f64
}
