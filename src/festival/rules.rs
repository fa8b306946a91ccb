//! Festival and schedule rule data
//!
//! Rules are plain data loaded from config. The resolver turns them into
//! concrete instants for a given `now`.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::error::FestivalError;

/// A wall-clock time of day written as `HH:MM`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Result<Self, FestivalError> {
        if hour > 23 || minute > 59 {
            return Err(FestivalError::InvalidRule(format!(
                "time {:02}:{:02} out of range",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl std::str::FromStr for ClockTime {
    type Err = FestivalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FestivalError::InvalidRule(format!("expected HH:MM, got {:?}", s));
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = hour.parse().map_err(|_| invalid())?;
        let minute = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = FestivalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// How to derive the next occurrence of a recurring date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FestivalRule {
    /// Gregorian month/day, optionally at a time of day
    Fixed {
        month: u32,
        day: u32,
        #[serde(default)]
        at: ClockTime,
    },
    /// Lunar month/day in the regular (non-leap) month
    Lunar { month: u32, day: u32 },
    /// Last day of a Gregorian month
    MonthEnd { month: u32 },
}

impl FestivalRule {
    pub fn fixed(month: u32, day: u32) -> Self {
        Self::Fixed {
            month,
            day,
            at: ClockTime::default(),
        }
    }

    pub fn lunar(month: u32, day: u32) -> Self {
        Self::Lunar { month, day }
    }

    /// Reject month/day values no calendar can satisfy
    pub fn validate(&self) -> Result<(), FestivalError> {
        let (month, day, max_day) = match self {
            Self::Fixed { month, day, .. } => (*month, *day, 31),
            Self::Lunar { month, day } => (*month, *day, 30),
            Self::MonthEnd { month } => (*month, 1, 1),
        };
        if !(1..=12).contains(&month) {
            return Err(FestivalError::InvalidRule(format!("month {} out of range", month)));
        }
        if !(1..=max_day).contains(&day) {
            return Err(FestivalError::InvalidRule(format!("day {} out of range", day)));
        }
        Ok(())
    }
}

/// Where a festival's progress bar starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Baseline {
    /// January 1 of the current year
    #[default]
    YearStart,
    /// The most recent past occurrence of the same festival
    PreviousOccurrence,
}

/// A named festival countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FestivalSpec {
    /// Stable identifier used by clients (defaults to a slug of `name`)
    #[serde(default)]
    pub key: Option<String>,
    pub name: String,
    pub rule: FestivalRule,
    #[serde(default)]
    pub baseline: Baseline,
}

impl FestivalSpec {
    pub fn new(name: impl Into<String>, rule: FestivalRule) -> Self {
        Self {
            key: None,
            name: name.into(),
            rule,
            baseline: Baseline::default(),
        }
    }

    /// Builder method: set the progress baseline
    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Builder method: set the key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Identifier for this festival
    pub fn slug(&self) -> String {
        if let Some(key) = &self.key {
            return key.clone();
        }
        let mut slug = String::new();
        for c in self.name.chars() {
            if c.is_alphanumeric() {
                slug.extend(c.to_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        slug.trim_end_matches('-').to_string()
    }
}

/// Weekday working hours for the off-work countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkdayRule {
    #[serde(default = "default_work_start")]
    pub start: ClockTime,
    #[serde(default = "default_work_end")]
    pub end: ClockTime,
}

fn default_work_start() -> ClockTime {
    ClockTime { hour: 8, minute: 30 }
}

fn default_work_end() -> ClockTime {
    ClockTime { hour: 17, minute: 0 }
}

impl Default for WorkdayRule {
    fn default() -> Self {
        Self {
            start: default_work_start(),
            end: default_work_end(),
        }
    }
}

/// Monthly payday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRule {
    #[serde(default = "default_salary_day")]
    pub day: u32,
}

fn default_salary_day() -> u32 {
    15
}

impl Default for SalaryRule {
    fn default() -> Self {
        Self {
            day: default_salary_day(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_time_parse() {
        assert_eq!("08:30".parse::<ClockTime>().unwrap(), ClockTime { hour: 8, minute: 30 });
        assert_eq!("17:00".parse::<ClockTime>().unwrap().to_string(), "17:00");
        assert!("25:00".parse::<ClockTime>().is_err());
        assert!("noon".parse::<ClockTime>().is_err());
    }

    #[test]
    fn test_rule_validation() {
        assert!(FestivalRule::fixed(2, 14).validate().is_ok());
        assert!(FestivalRule::fixed(13, 1).validate().is_err());
        assert!(FestivalRule::fixed(2, 0).validate().is_err());
        assert!(FestivalRule::lunar(12, 30).validate().is_ok());
        assert!(FestivalRule::lunar(12, 31).validate().is_err());
        assert!(FestivalRule::MonthEnd { month: 2 }.validate().is_ok());
    }

    #[test]
    fn test_rule_deserialize() {
        #[derive(Deserialize)]
        struct Wrapper {
            festivals: Vec<FestivalSpec>,
        }

        let parsed: Wrapper = toml::from_str(
            r#"
            [[festivals]]
            name = "Company Holiday"
            rule = { kind = "fixed", month = 1, day = 23, at = "17:30" }

            [[festivals]]
            name = "Spring Festival"
            baseline = "previous_occurrence"
            rule = { kind = "lunar", month = 1, day = 1 }

            [[festivals]]
            key = "feb-end"
            name = "End of February"
            rule = { kind = "month_end", month = 2 }
            "#,
        )
        .unwrap();

        assert_eq!(
            parsed.festivals[0].rule,
            FestivalRule::Fixed {
                month: 1,
                day: 23,
                at: ClockTime { hour: 17, minute: 30 },
            }
        );
        assert_eq!(parsed.festivals[1].baseline, Baseline::PreviousOccurrence);
        assert_eq!(parsed.festivals[1].slug(), "spring-festival");
        assert_eq!(parsed.festivals[2].slug(), "feb-end");
    }

    #[test]
    fn test_defaults() {
        let workday = WorkdayRule::default();
        assert_eq!(workday.start.to_string(), "08:30");
        assert_eq!(workday.end.to_string(), "17:00");
        assert_eq!(SalaryRule::default().day, 15);
    }
}
