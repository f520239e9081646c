//! Backend spatial reference cache inspection.

use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};
use serde_json::json;
use tracing::info;

use crate::state::AppState;

/// GET /api/sr-cache
pub async fn sr_cache_stats_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.detector.cache_stats().await)
}

/// POST /api/sr-cache/clear
pub async fn sr_cache_clear_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> impl IntoResponse {
    let before = state.detector.cache_stats().await;
    state.detector.clear_cache().await;
    info!(cleared = before.total_entries, "SR cache cleared via API");

    Json(json!({
        "success": true,
        "cleared_entries": before.total_entries,
    }))
}
