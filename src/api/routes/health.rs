//! Health Routes
//!
//! - GET /health/live - Liveness (process is alive)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// Degraded when the ticker is not running.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ticker_running = state.ticker.is_running();

    Json(HealthResponse {
        status: if ticker_running { "healthy" } else { "degraded" }.to_string(),
        ticker: if ticker_running { "running" } else { "stopped" }.to_string(),
        weather: if state.weather.is_some() {
            "configured"
        } else {
            "disabled"
        }
        .to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
