//! Time Progress Calculator
//!
//! Pure arithmetic over period windows:
//! - `PeriodWindow`: a `[start, end]` span in local wall-clock time
//! - `Breakdown`: a duration split into days/hours/minutes/seconds
//! - `compute_progress`: elapsed, remaining and percent for a window at `now`
//!
//! Nothing here samples the clock. Callers pass `now` in so every figure
//! derived within one tick agrees with the others.

mod breakdown;
mod calculator;
mod error;
mod window;

pub use breakdown::{Breakdown, CountdownFormat, SECONDS_PER_DAY};
pub use calculator::{compute_progress, percent_of, ProgressResult};
pub use error::WindowError;
pub use window::{days_in_month, days_in_year, PeriodWindow};
