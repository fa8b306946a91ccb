//! Festival resolution
//!
//! Turns rule data into concrete instants relative to `now`, then hands the
//! resulting windows to the progress calculator.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use super::error::{FestivalError, FestivalResult};
use super::lunar::{lunar_to_gregorian_clamped, LunarCalendar, LunarDate, TableLunarCalendar};
use super::rules::{Baseline, FestivalRule, FestivalSpec, SalaryRule, WorkdayRule};
use crate::progress::{compute_progress, days_in_month, PeriodWindow, ProgressResult};

/// The most recent and the upcoming occurrence of a recurring date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrences {
    pub current: NaiveDateTime,
    pub next: NaiveDateTime,
}

/// Festival countdown state at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FestivalProgress {
    pub occurrences: Occurrences,
    pub window: PeriodWindow,
    pub progress: ProgressResult,
}

/// Where the working day stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkdayStatus {
    Weekend,
    BeforeWork,
    Working,
    OffWork,
}

/// Off-work countdown state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkdayProgress {
    pub status: WorkdayStatus,
    /// `None` on weekends
    pub window: Option<PeriodWindow>,
    pub progress: ProgressResult,
}

/// Payday countdown state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryProgress {
    pub previous: NaiveDateTime,
    pub next: NaiveDateTime,
    pub is_payday: bool,
    pub progress: ProgressResult,
}

/// Resolves festival rules against a lunar calendar
#[derive(Clone)]
pub struct FestivalResolver {
    lunar: Arc<dyn LunarCalendar>,
}

impl Default for FestivalResolver {
    fn default() -> Self {
        Self::new(Arc::new(TableLunarCalendar::new()))
    }
}

impl std::fmt::Debug for FestivalResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FestivalResolver").finish_non_exhaustive()
    }
}

impl FestivalResolver {
    pub fn new(lunar: Arc<dyn LunarCalendar>) -> Self {
        Self { lunar }
    }

    pub fn lunar(&self) -> &dyn LunarCalendar {
        self.lunar.as_ref()
    }

    /// Next occurrence of `rule` at or after `now`
    pub fn next_occurrence(
        &self,
        rule: &FestivalRule,
        now: NaiveDateTime,
    ) -> FestivalResult<NaiveDateTime> {
        Ok(self.occurrences(rule, now)?.next)
    }

    /// Most recent and next occurrence of `rule` around `now`
    pub fn occurrences(
        &self,
        rule: &FestivalRule,
        now: NaiveDateTime,
    ) -> FestivalResult<Occurrences> {
        rule.validate()?;

        match *rule {
            FestivalRule::Fixed { month, day, at } => {
                let at = at.to_naive_time();
                let candidate = fixed_in_year(now.year(), month, day, at)?;
                let next = if now > candidate {
                    fixed_in_year(now.year() + 1, month, day, at)?
                } else {
                    candidate
                };
                let current = fixed_in_year(next.year() - 1, month, day, at)?;
                Ok(Occurrences { current, next })
            }
            FestivalRule::Lunar { month, day } => {
                let lunar_year = self.lunar.gregorian_to_lunar(now.date())?.year;
                let candidate = self.lunar_in_year(lunar_year, month, day)?;
                if now > candidate {
                    Ok(Occurrences {
                        current: candidate,
                        next: self.lunar_in_year(lunar_year + 1, month, day)?,
                    })
                } else {
                    Ok(Occurrences {
                        current: self.lunar_in_year(lunar_year - 1, month, day)?,
                        next: candidate,
                    })
                }
            }
            FestivalRule::MonthEnd { month } => {
                let year = if now.month() > month {
                    now.year() + 1
                } else {
                    now.year()
                };
                Ok(Occurrences {
                    current: month_end(year - 1, month)?,
                    next: month_end(year, month)?,
                })
            }
        }
    }

    /// Progress of a festival countdown over its baseline window
    pub fn festival_progress(
        &self,
        spec: &FestivalSpec,
        now: NaiveDateTime,
    ) -> FestivalResult<FestivalProgress> {
        let occurrences = self.occurrences(&spec.rule, now)?;
        let start = match spec.baseline {
            Baseline::YearStart => start_of_year(now.year())?,
            Baseline::PreviousOccurrence => occurrences.current,
        };
        let window = PeriodWindow::new(start, occurrences.next)?;

        Ok(FestivalProgress {
            occurrences,
            window,
            progress: compute_progress(&window, now),
        })
    }

    fn lunar_in_year(&self, year: i32, month: u32, day: u32) -> FestivalResult<NaiveDateTime> {
        let date = lunar_to_gregorian_clamped(self.lunar(), LunarDate::new(year, month, day))?;
        Ok(date.and_time(NaiveTime::MIN))
    }
}

/// Off-work countdown for the day containing `now`
pub fn workday_progress(rule: &WorkdayRule, now: NaiveDateTime) -> FestivalResult<WorkdayProgress> {
    if matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
        return Ok(WorkdayProgress {
            status: WorkdayStatus::Weekend,
            window: None,
            progress: ProgressResult::complete(),
        });
    }

    if rule.end < rule.start {
        return Err(FestivalError::InvalidRule(format!(
            "workday ends at {} before it starts at {}",
            rule.end, rule.start
        )));
    }

    let today = now.date();
    let start = today.and_time(rule.start.to_naive_time());
    let end = today.and_time(rule.end.to_naive_time());
    let window = PeriodWindow::new(start, end)?;

    let status = if now < start {
        WorkdayStatus::BeforeWork
    } else if now >= end {
        WorkdayStatus::OffWork
    } else {
        WorkdayStatus::Working
    };

    Ok(WorkdayProgress {
        status,
        window: Some(window),
        progress: compute_progress(&window, now),
    })
}

/// Payday countdown for `now`
pub fn salary_progress(rule: &SalaryRule, now: NaiveDateTime) -> FestivalResult<SalaryProgress> {
    if !(1..=31).contains(&rule.day) {
        return Err(FestivalError::InvalidRule(format!(
            "salary day {} out of range",
            rule.day
        )));
    }

    let this_month = salary_date(now.year(), now.month(), rule.day)?;
    let today = now.day();
    let is_payday = today == this_month.day();

    let next = if today < this_month.day() {
        this_month
    } else {
        let (year, month) = next_month(now.year(), now.month());
        salary_date(year, month, rule.day)?
    };
    let (prev_year, prev_month) = previous_month(next.year(), next.month());
    let previous = salary_date(prev_year, prev_month, rule.day)?;

    let next = next.and_time(NaiveTime::MIN);
    let previous = previous.and_time(NaiveTime::MIN);

    let progress = if is_payday {
        ProgressResult::complete()
    } else {
        compute_progress(&PeriodWindow::new(previous, next)?, now)
    };

    Ok(SalaryProgress {
        previous,
        next,
        is_payday,
        progress,
    })
}

fn clamped_date(year: i32, month: u32, day: u32) -> FestivalResult<NaiveDate> {
    let last = days_in_month(year, month)
        .ok_or_else(|| FestivalError::OutOfRange(format!("{}-{:02}", year, month)))?;
    NaiveDate::from_ymd_opt(year, month, day.min(last))
        .ok_or_else(|| FestivalError::OutOfRange(format!("{}-{:02}-{:02}", year, month, day)))
}

fn fixed_in_year(year: i32, month: u32, day: u32, at: NaiveTime) -> FestivalResult<NaiveDateTime> {
    Ok(clamped_date(year, month, day)?.and_time(at))
}

fn month_end(year: i32, month: u32) -> FestivalResult<NaiveDateTime> {
    Ok(clamped_date(year, month, 31)?.and_time(NaiveTime::MIN))
}

fn salary_date(year: i32, month: u32, day: u32) -> FestivalResult<NaiveDate> {
    clamped_date(year, month, day)
}

fn start_of_year(year: i32) -> FestivalResult<NaiveDateTime> {
    Ok(clamped_date(year, 1, 1)?.and_time(NaiveTime::MIN))
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::festival::lunar::LunarError;
    use crate::festival::rules::ClockTime;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        at(y, m, d, 0, 0)
    }

    #[test]
    fn test_fixed_rule_next_occurrence() {
        let resolver = FestivalResolver::default();
        let valentine = FestivalRule::fixed(2, 14);

        assert_eq!(
            resolver.next_occurrence(&valentine, day(2025, 1, 1)),
            Ok(day(2025, 2, 14))
        );
        assert_eq!(
            resolver.next_occurrence(&valentine, day(2025, 3, 1)),
            Ok(day(2026, 2, 14))
        );
        // Equality counts as not yet passed
        assert_eq!(
            resolver.next_occurrence(&valentine, day(2025, 2, 14)),
            Ok(day(2025, 2, 14))
        );
    }

    #[test]
    fn test_fixed_rule_with_clock_time() {
        let resolver = FestivalResolver::default();
        let holiday = FestivalRule::Fixed {
            month: 1,
            day: 23,
            at: ClockTime::new(17, 30).unwrap(),
        };

        let occ = resolver.occurrences(&holiday, at(2025, 1, 23, 17, 0)).unwrap();
        assert_eq!(occ.next, at(2025, 1, 23, 17, 30));
        assert_eq!(occ.current, at(2024, 1, 23, 17, 30));

        let occ = resolver.occurrences(&holiday, at(2025, 1, 23, 18, 0)).unwrap();
        assert_eq!(occ.next, at(2026, 1, 23, 17, 30));
        assert_eq!(occ.current, at(2025, 1, 23, 17, 30));
    }

    #[test]
    fn test_fixed_rule_clamps_leap_day() {
        let resolver = FestivalResolver::default();
        let leap_day = FestivalRule::fixed(2, 29);
        assert_eq!(
            resolver.next_occurrence(&leap_day, day(2025, 1, 1)),
            Ok(day(2025, 2, 28))
        );
        assert_eq!(
            resolver.next_occurrence(&leap_day, day(2027, 3, 1)),
            Ok(day(2028, 2, 29))
        );
    }

    #[test]
    fn test_spring_festival_current_and_next() {
        let resolver = FestivalResolver::default();
        let spring = FestivalRule::lunar(1, 1);

        // Before this year's festival
        let occ = resolver.occurrences(&spring, day(2025, 1, 10)).unwrap();
        assert_eq!(occ.current, day(2024, 2, 10));
        assert_eq!(occ.next, day(2025, 1, 29));

        // After it
        let occ = resolver.occurrences(&spring, day(2025, 3, 1)).unwrap();
        assert_eq!(occ.current, day(2025, 1, 29));
        assert_eq!(occ.next, day(2026, 2, 17));

        // Late in the Gregorian year, still the same lunar year
        let occ = resolver.occurrences(&spring, day(2025, 12, 31)).unwrap();
        assert_eq!(occ.next, day(2026, 2, 17));
    }

    #[test]
    fn test_other_lunar_festivals() {
        let resolver = FestivalResolver::default();
        assert_eq!(
            resolver.next_occurrence(&FestivalRule::lunar(8, 15), day(2025, 6, 1)),
            Ok(day(2025, 10, 6))
        );
        assert_eq!(
            resolver.next_occurrence(&FestivalRule::lunar(5, 5), day(2025, 1, 1)),
            Ok(day(2025, 5, 31))
        );
        // Lunar 2024/12 has 29 days, so day 30 clamps
        assert_eq!(
            resolver.next_occurrence(&FestivalRule::lunar(12, 30), day(2025, 1, 10)),
            Ok(day(2025, 1, 28))
        );
    }

    #[test]
    fn test_month_end_rule() {
        let resolver = FestivalResolver::default();
        let feb_end = FestivalRule::MonthEnd { month: 2 };

        assert_eq!(
            resolver.next_occurrence(&feb_end, day(2025, 1, 5)),
            Ok(day(2025, 2, 28))
        );
        assert_eq!(
            resolver.next_occurrence(&feb_end, day(2027, 3, 5)),
            Ok(day(2028, 2, 29))
        );
    }

    #[test]
    fn test_festival_progress_year_start_baseline() {
        let resolver = FestivalResolver::default();
        let spec = FestivalSpec::new("Labor Day", FestivalRule::fixed(5, 1));

        let result = resolver.festival_progress(&spec, day(2025, 3, 1)).unwrap();
        assert_eq!(result.window.start(), day(2025, 1, 1));
        assert_eq!(result.window.end(), day(2025, 5, 1));
        assert!(result.progress.percent > 0.0 && result.progress.percent < 100.0);
        assert_eq!(result.progress.remaining.days, 61);
    }

    #[test]
    fn test_festival_progress_previous_occurrence_baseline() {
        let resolver = FestivalResolver::default();
        let spec = FestivalSpec::new("Spring Festival", FestivalRule::lunar(1, 1))
            .baseline(Baseline::PreviousOccurrence);

        let result = resolver.festival_progress(&spec, day(2025, 3, 1)).unwrap();
        assert_eq!(result.window.start(), day(2025, 1, 29));
        assert_eq!(result.window.end(), day(2026, 2, 17));
        assert!(result.progress.percent > 0.0 && result.progress.percent < 20.0);
    }

    #[test]
    fn test_passed_target_shows_zero_remaining() {
        let resolver = FestivalResolver::default();
        let spec = FestivalSpec::new("End of February", FestivalRule::MonthEnd { month: 2 });

        let result = resolver.festival_progress(&spec, at(2025, 2, 28, 9, 0)).unwrap();
        assert!(result.progress.remaining.is_zero());
        assert_eq!(result.progress.remaining.clock(), "00:00:00");
        assert_eq!(result.progress.percent, 100.0);
    }

    #[test]
    fn test_lunar_out_of_range_is_error() {
        let resolver = FestivalResolver::default();
        let result = resolver.occurrences(&FestivalRule::lunar(1, 1), day(1899, 6, 1));
        assert!(matches!(
            result,
            Err(FestivalError::Lunar(LunarError::DateOutOfRange(_)))
        ));
    }

    #[test]
    fn test_invalid_rule_rejected() {
        let resolver = FestivalResolver::default();
        assert!(matches!(
            resolver.next_occurrence(&FestivalRule::fixed(13, 1), day(2025, 1, 1)),
            Err(FestivalError::InvalidRule(_))
        ));
    }

    #[test]
    fn test_workday_weekend_short_circuit() {
        let rule = WorkdayRule::default();
        // 2025-01-04 is a Saturday, 2025-01-05 a Sunday
        for now in [at(2025, 1, 4, 3, 0), at(2025, 1, 4, 12, 0), at(2025, 1, 5, 23, 59)] {
            let result = workday_progress(&rule, now).unwrap();
            assert_eq!(result.status, WorkdayStatus::Weekend);
            assert_eq!(result.progress.percent, 100.0);
            assert!(result.progress.remaining.is_zero());
        }
    }

    #[test]
    fn test_workday_statuses() {
        let rule = WorkdayRule::default();

        let before = workday_progress(&rule, at(2025, 1, 6, 7, 0)).unwrap();
        assert_eq!(before.status, WorkdayStatus::BeforeWork);
        assert_eq!(before.progress.percent, 0.0);

        let working = workday_progress(&rule, at(2025, 1, 6, 12, 45)).unwrap();
        assert_eq!(working.status, WorkdayStatus::Working);
        assert!((working.progress.percent - 50.0).abs() < 1e-9);
        assert_eq!(working.progress.remaining.total_hours(), 4);
        assert_eq!(working.progress.remaining.minutes, 15);

        let off = workday_progress(&rule, at(2025, 1, 6, 17, 0)).unwrap();
        assert_eq!(off.status, WorkdayStatus::OffWork);
        assert_eq!(off.progress.percent, 100.0);
        assert!(off.progress.remaining.is_zero());
    }

    #[test]
    fn test_workday_inverted_hours() {
        let rule = WorkdayRule {
            start: ClockTime::new(18, 0).unwrap(),
            end: ClockTime::new(9, 0).unwrap(),
        };
        assert!(workday_progress(&rule, at(2025, 1, 6, 12, 0)).is_err());
    }

    #[test]
    fn test_salary_next_date() {
        let rule = SalaryRule::default();

        let result = salary_progress(&rule, day(2025, 1, 10)).unwrap();
        assert_eq!(result.next, day(2025, 1, 15));
        assert_eq!(result.previous, day(2024, 12, 15));
        assert!(!result.is_payday);

        let result = salary_progress(&rule, day(2025, 1, 20)).unwrap();
        assert_eq!(result.next, day(2025, 2, 15));
        assert_eq!(result.previous, day(2025, 1, 15));
    }

    #[test]
    fn test_salary_payday() {
        let result = salary_progress(&SalaryRule::default(), at(2025, 1, 15, 10, 0)).unwrap();
        assert!(result.is_payday);
        assert_eq!(result.progress.percent, 100.0);
        assert_eq!(result.next, day(2025, 2, 15));
    }

    #[test]
    fn test_salary_day_clamps_to_short_month() {
        let rule = SalaryRule { day: 31 };

        let result = salary_progress(&rule, day(2025, 2, 10)).unwrap();
        assert_eq!(result.next, day(2025, 2, 28));
        assert_eq!(result.previous, day(2025, 1, 31));

        let result = salary_progress(&rule, at(2025, 2, 28, 8, 0)).unwrap();
        assert!(result.is_payday);
        assert_eq!(result.next, day(2025, 3, 31));
    }

    #[test]
    fn test_deterministic() {
        let resolver = FestivalResolver::default();
        let spec = FestivalSpec::new("Mid-Autumn", FestivalRule::lunar(8, 15));
        let now = at(2025, 7, 1, 9, 30);
        assert_eq!(
            resolver.festival_progress(&spec, now),
            resolver.festival_progress(&spec, now)
        );
    }
}
