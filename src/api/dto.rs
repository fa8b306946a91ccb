//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::theme::Theme;
use crate::weather::WeatherReport;

/// Full health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,
    /// "running" or "stopped"
    pub ticker: String,
    /// "configured" or "disabled"
    pub weather: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Current weather panel state
#[derive(Debug, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub report: WeatherReport,
    pub fetched_at: NaiveDateTime,
}

/// Current theme
#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub theme: Theme,
}

/// Theme change request; the value is validated by the handler
#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub theme: String,
}
