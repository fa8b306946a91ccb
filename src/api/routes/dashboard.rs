//! Dashboard Routes
//!
//! - GET /api/v1/dashboard - Every card at the current instant
//! - GET /api/v1/dashboard/:key - A single card
//! - GET /api/v1/calendar - Solar and lunar header lines

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::{CalendarHeader, Card, DashboardSnapshot};

/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSnapshot> {
    Json(state.snapshot_now())
}

/// GET /api/v1/dashboard/:key
pub async fn get_card(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> ApiResult<Json<Card>> {
    let dashboard = state.ticker.dashboard();
    let now = state.ticker.clock().now();

    dashboard
        .widgets()
        .iter()
        .find(|w| w.key() == key)
        .map(|w| Json(dashboard.card(w, now)))
        .ok_or_else(|| ApiError::NotFound(format!("card {}", key)))
}

/// GET /api/v1/calendar
pub async fn get_calendar(State(state): State<Arc<AppState>>) -> Json<CalendarHeader> {
    let now = state.ticker.clock().now();
    Json(CalendarHeader::at(now, state.ticker.dashboard().resolver().lunar()))
}
