//! Progress computation
//!
//! # Boundary policy
//! - `now < start` reports 0%, `now > end` reports 100%
//! - a zero-length window reports 100% once `now >= start`, else 0%
//! - elapsed and remaining are measured on `now` clamped into the window

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::breakdown::Breakdown;
use super::window::PeriodWindow;

/// Progress of a window at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressResult {
    /// Time since the window started
    pub elapsed: Breakdown,
    /// Time until the window ends
    pub remaining: Breakdown,
    /// 0.0..=100.0
    pub percent: f64,
}

impl ProgressResult {
    /// A window that has fully elapsed with nothing remaining
    pub fn complete() -> Self {
        Self {
            elapsed: Breakdown::default(),
            remaining: Breakdown::default(),
            percent: 100.0,
        }
    }
}

/// Compute elapsed/remaining time and percent for `window` at `now`
pub fn compute_progress(window: &PeriodWindow, now: NaiveDateTime) -> ProgressResult {
    let clamped = window.clamp(now);
    let elapsed = clamped.signed_duration_since(window.start());
    let remaining = window.end().signed_duration_since(clamped);

    ProgressResult {
        elapsed: Breakdown::from_duration(elapsed),
        remaining: Breakdown::from_duration(remaining),
        percent: percent_of(window, now),
    }
}

/// Percent of `window` elapsed at `now`
pub fn percent_of(window: &PeriodWindow, now: NaiveDateTime) -> f64 {
    if now < window.start() {
        return 0.0;
    }
    if now > window.end() || window.is_empty() {
        return 100.0;
    }

    let total = window.length().num_milliseconds() as f64;
    let elapsed = now.signed_duration_since(window.start()).num_milliseconds() as f64;
    (elapsed / total * 100.0).clamp(0.0, 100.0)
}
