//! tickboard API Server
//!
//! Run with: cargo run --bin tickboard-api
//!
//! # Configuration
//!
//! Reads `config.toml` from the standard locations. Environment variables:
//! - `TICKBOARD_API_HOST`: Host to bind to (default: 127.0.0.1)
//! - `TICKBOARD_API_PORT`: Port to listen on (default: 8086)
//! - `TICKBOARD_TICK_MS`: Snapshot period in milliseconds (default: 1000)
//! - `TICKBOARD_WEATHER_URL`: Weather webhook
//! - `TICKBOARD_THEME_PATH`: Theme settings file
//! - `RUST_LOG`: Log filter (default: tickboard=info)

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

use tickboard::api::{serve, AppState};
use tickboard::config::Config;
use tickboard::dashboard::Dashboard;
use tickboard::festival::FestivalResolver;
use tickboard::theme::ThemeSettings;
use tickboard::ticker::{SystemClock, Ticker};
use tickboard::weather::WeatherClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    tickboard::logging::init(&config.logging);

    tracing::info!("Starting tickboard API server v{}", env!("CARGO_PKG_VERSION"));

    let dashboard = Dashboard::new(config.widgets(), FestivalResolver::default())
        .with_format(config.dashboard.countdown_format);
    tracing::info!(widgets = dashboard.widgets().len(), "Dashboard configured");

    let ticker = Arc::new(Ticker::new(
        Arc::new(dashboard),
        Arc::new(SystemClock),
        Duration::from_millis(config.dashboard.tick_interval_ms),
    ));

    let store_path = config.theme.resolved_path();
    let theme = ThemeSettings::load(&store_path)
        .with_context(|| format!("opening theme store {}", store_path.display()))?;

    // A broken weather client only disables the weather endpoint
    let weather = match WeatherClient::new(&config.weather) {
        Ok(client) => {
            tracing::info!(url = %client.url(), "Weather webhook configured");
            Some(client)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Weather disabled");
            None
        }
    };

    let ticker_handle = Arc::clone(&ticker).start();

    let state = AppState::new(
        Arc::clone(&ticker),
        theme,
        weather,
        config.weather.banner_dismiss_secs,
        config.api.clone(),
    );

    serve(state, &config.api).await?;

    ticker.stop();
    ticker_handle.abort();
    tracing::info!("tickboard API server stopped");

    Ok(())
}
