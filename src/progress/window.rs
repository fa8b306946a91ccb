//! Period windows
//!
//! A `PeriodWindow` is the span a progress bar measures. The calendar
//! helpers build the four standard dashboard periods around an instant.

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::error::WindowError;

/// A `[start, end]` span in local wall-clock time, with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl PeriodWindow {
    /// Create a window, rejecting `end < start`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, WindowError> {
        if end < start {
            return Err(WindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create a window of `length` beginning at `start`
    pub fn starting_at(start: NaiveDateTime, length: Duration) -> Result<Self, WindowError> {
        let end = start
            .checked_add_signed(length)
            .ok_or_else(|| WindowError::OutOfRange(format!("{} + {}", start, length)))?;
        Self::new(start, end)
    }

    /// Midnight to midnight of the day containing `now`
    pub fn day_of(now: NaiveDateTime) -> Result<Self, WindowError> {
        Self::starting_at(midnight(now.date()), Duration::days(1))
    }

    /// Monday 00:00 to the following Monday 00:00
    pub fn week_of(now: NaiveDateTime) -> Result<Self, WindowError> {
        let days_from_monday = i64::from(now.weekday().num_days_from_monday());
        let monday = now
            .date()
            .checked_sub_signed(Duration::days(days_from_monday))
            .ok_or_else(|| WindowError::OutOfRange(format!("week of {}", now)))?;
        Self::starting_at(midnight(monday), Duration::days(7))
    }

    /// The first of the month to the first of the next month
    pub fn month_of(now: NaiveDateTime) -> Result<Self, WindowError> {
        let first = first_of_month(now.year(), now.month())?;
        let next = first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| WindowError::OutOfRange(format!("month after {}", first)))?;
        Self::new(midnight(first), midnight(next))
    }

    /// January 1 to the next January 1
    pub fn year_of(now: NaiveDateTime) -> Result<Self, WindowError> {
        let first = first_of_month(now.year(), 1)?;
        let next = first_of_month(now.year() + 1, 1)?;
        Self::new(midnight(first), midnight(next))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Total length of the window
    pub fn length(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    /// Whether the window has zero length
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Clamp an instant into the window
    pub fn clamp(&self, now: NaiveDateTime) -> NaiveDateTime {
        now.clamp(self.start, self.end)
    }

    /// Check if an instant falls within the window (inclusive)
    pub fn contains(&self, now: NaiveDateTime) -> bool {
        now >= self.start && now <= self.end
    }
}

impl std::fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Number of days in a Gregorian month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Number of days in a Gregorian year
pub fn days_in_year(year: i32) -> u32 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, WindowError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| WindowError::OutOfRange(format!("{}-{:02}", year, month)))
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
