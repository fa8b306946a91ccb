//! Progress error types

use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised while building a period window
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// The window would end before it starts
    #[error("Invalid window: end {end} is before start {start}")]
    Inverted {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// A calendar boundary could not be represented (year out of range)
    #[error("Calendar boundary out of range: {0}")]
    OutOfRange(String),
}
