//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use crate::config::ApiConfig;
use crate::dashboard::DashboardSnapshot;
use crate::theme::ThemeSettings;
use crate::ticker::Ticker;
use crate::weather::{WeatherClient, WeatherPanel};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Ticker owning the dashboard, the clock and the snapshot stream
    pub ticker: Arc<Ticker>,
    /// Theme flag, written only by the theme endpoints
    pub theme: Arc<RwLock<ThemeSettings>>,
    /// Weather webhook client (None when disabled)
    pub weather: Option<WeatherClient>,
    /// Last weather report and error banner
    pub weather_panel: Arc<RwLock<WeatherPanel>>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        ticker: Arc<Ticker>,
        theme: ThemeSettings,
        weather: Option<WeatherClient>,
        banner_dismiss_secs: u64,
        config: ApiConfig,
    ) -> Self {
        Self {
            ticker,
            theme: Arc::new(RwLock::new(theme)),
            weather,
            weather_panel: Arc::new(RwLock::new(WeatherPanel::new(banner_dismiss_secs))),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Snapshot at the clock's current instant
    pub fn snapshot_now(&self) -> DashboardSnapshot {
        self.ticker.dashboard().snapshot(self.ticker.clock().now())
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
