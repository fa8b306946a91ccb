//! Weather Routes
//!
//! - GET /api/v1/weather - Fetch current conditions from the webhook
//!
//! A failed fetch answers 502 with the error banner in the body.

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::WeatherResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /api/v1/weather
pub async fn get_weather(State(state): State<Arc<AppState>>) -> ApiResult<Json<WeatherResponse>> {
    let client = state
        .weather
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("weather is not configured".to_string()))?;

    let now = state.ticker.clock().now();
    let result = client.fetch().await;

    let mut panel = state.weather_panel.write().await;
    match result {
        Ok(report) => {
            panel.record_success(report.clone(), now);
            Ok(Json(WeatherResponse {
                report,
                fetched_at: now,
            }))
        }
        Err(e) => {
            panel.record_failure(&e, now);
            Err(ApiError::Upstream {
                message: e.to_string(),
                banner: panel.banner.clone(),
            })
        }
    }
}
