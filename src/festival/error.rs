//! Festival resolution error types

use thiserror::Error;

use super::lunar::LunarError;
use crate::progress::WindowError;

/// Errors that can occur while resolving a festival or schedule rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FestivalError {
    /// Lunar conversion failed (usually a year outside the table)
    #[error("Lunar conversion failed: {0}")]
    Lunar(#[from] LunarError),

    /// A progress window could not be built
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Rule data is unusable (month 13, end before start, ...)
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    /// A date could not be represented
    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

/// Result type alias for festival operations
pub type FestivalResult<T> = Result<T, FestivalError>;
