//! Festival and schedule resolution
//!
//! Resolves recurring calendar rules (fixed Gregorian dates, lunar dates,
//! month ends) to concrete instants, plus the weekday off-work and monthly
//! payday countdowns.

pub mod error;
pub mod lunar;
pub mod resolver;
pub mod rules;

pub use error::{FestivalError, FestivalResult};
pub use lunar::{LunarCalendar, LunarDate, LunarError, TableLunarCalendar};
pub use resolver::{
    salary_progress, workday_progress, FestivalProgress, FestivalResolver, Occurrences,
    SalaryProgress, WorkdayProgress, WorkdayStatus,
};
pub use rules::{Baseline, ClockTime, FestivalRule, FestivalSpec, SalaryRule, WorkdayRule};
