//! WMS to ArcGIS REST proxy service library.
//!
//! Exposes the router and its building blocks so they can be exercised
//! in-process by the integration tests.

pub mod client;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod relay;
pub mod sr_detector;
pub mod state;
pub mod translator;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the HTTP router around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WMS endpoints
        .route("/", get(handlers::wms_handler))
        .route("/wms", get(handlers::wms_handler))
        // Direct ArcGIS REST passthrough
        .route("/arcgis/*path", get(handlers::arcgis_proxy_handler))
        // Health and metrics
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        // SR cache management
        .route("/api/sr-cache", get(handlers::sr_cache_stats_handler))
        .route("/api/sr-cache/clear", post(handlers::sr_cache_clear_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
