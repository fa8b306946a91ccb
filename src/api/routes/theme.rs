//! Theme Routes
//!
//! - GET /api/v1/theme - Current theme
//! - PUT /api/v1/theme - Set the theme
//! - POST /api/v1/theme/toggle - Flip light/dark

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{ThemeRequest, ThemeResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::theme::Theme;

/// GET /api/v1/theme
pub async fn get_theme(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    let theme = state.theme.read().await.theme();
    Json(ThemeResponse { theme })
}

/// PUT /api/v1/theme
pub async fn set_theme(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ThemeRequest>,
) -> ApiResult<Json<ThemeResponse>> {
    let theme: Theme = request.theme.parse().map_err(ApiError::Validation)?;
    state.theme.write().await.set(theme)?;
    Ok(Json(ThemeResponse { theme }))
}

/// POST /api/v1/theme/toggle
pub async fn toggle_theme(State(state): State<Arc<AppState>>) -> ApiResult<Json<ThemeResponse>> {
    let theme = state.theme.write().await.toggle()?;
    Ok(Json(ThemeResponse { theme }))
}
