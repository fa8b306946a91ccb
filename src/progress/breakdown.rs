//! Duration breakdowns
//!
//! Splits a non-negative duration into day/hour/minute/second components
//! for display. Negative inputs (a target already passed) floor to zero, so
//! a countdown never shows negative figures.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Seconds in one day
pub const SECONDS_PER_DAY: i64 = 24 * 3600;

/// A duration decomposed into display units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub days: i64,
    /// 0..=23
    pub hours: u32,
    /// 0..=59
    pub minutes: u32,
    /// 0..=59
    pub seconds: u32,
    /// 0..=999
    pub millis: u32,
}

impl Breakdown {
    /// Decompose a whole number of seconds
    pub fn from_seconds(total_seconds: i64) -> Self {
        Self::from_millis(total_seconds.saturating_mul(1000))
    }

    /// Decompose a whole number of minutes (seconds stay zero)
    pub fn from_minutes(total_minutes: i64) -> Self {
        Self::from_seconds(total_minutes.saturating_mul(60))
    }

    /// Decompose a number of milliseconds
    pub fn from_millis(total_millis: i64) -> Self {
        if total_millis <= 0 {
            return Self::default();
        }

        let total_seconds = total_millis / 1000;
        Self {
            days: total_seconds / SECONDS_PER_DAY,
            hours: ((total_seconds % SECONDS_PER_DAY) / 3600) as u32,
            minutes: ((total_seconds % 3600) / 60) as u32,
            seconds: (total_seconds % 60) as u32,
            millis: (total_millis % 1000) as u32,
        }
    }

    /// Decompose a chrono duration
    pub fn from_duration(duration: Duration) -> Self {
        Self::from_millis(duration.num_milliseconds())
    }

    /// Whole seconds represented (milliseconds dropped)
    pub fn total_seconds(&self) -> i64 {
        self.days * SECONDS_PER_DAY
            + i64::from(self.hours) * 3600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds)
    }

    /// Hours with the day term folded in
    pub fn total_hours(&self) -> i64 {
        self.days * 24 + i64::from(self.hours)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// `HH:MM:SS` with the day term ignored
    pub fn clock(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }

    /// `D HH:MM:SS.mmm` for the high-frequency countdown
    pub fn precise(&self) -> String {
        format!(
            "{} {:02}:{:02}:{:02}.{:03}",
            self.days, self.hours, self.minutes, self.seconds, self.millis
        )
    }

    /// Countdown text in one of the supported layouts
    pub fn countdown(&self, format: CountdownFormat) -> String {
        let (d, h, m, s) = (self.days, self.hours, self.minutes, self.seconds);
        match format {
            CountdownFormat::Standard => format!("{}d {}h {}m {}s left", d, h, m, s),
            CountdownFormat::Compact => format!("{}d{}h{}m{}s left", d, h, m, s),
            CountdownFormat::Detailed => {
                format!("{} days {} hours {} minutes {} seconds left", d, h, m, s)
            }
            CountdownFormat::Short => format!("{}d{}h{}m{}s", d, h, m, s),
        }
    }
}

impl std::fmt::Display for Breakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d {}", self.days, self.clock())
    }
}

/// Countdown text layouts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownFormat {
    #[default]
    Standard,
    Compact,
    Detailed,
    Short,
}

impl std::str::FromStr for CountdownFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "compact" => Ok(Self::Compact),
            "detailed" => Ok(Self::Detailed),
            "short" => Ok(Self::Short),
            other => Err(format!("unknown countdown format: {}", other)),
        }
    }
}
