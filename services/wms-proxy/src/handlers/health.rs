//! Health check against the upstream ArcGIS server.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::state::AppState;

/// Upper bound on the upstream probe.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub upstream: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /health - 200 when the ArcGIS services directory answers, else 503
#[instrument(skip(state))]
pub async fn health_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let url = format!("{}/arcgis/rest/services", state.config.arcgis_base_url());

    let probe = match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, state.client.get(&url)).await {
        Ok(Ok(resp)) if resp.status < 400 => Ok(()),
        Ok(Ok(resp)) => Err(format!("health check failed with status: {}", resp.status)),
        Ok(Err(e)) => Err(format!("health check failed: {}", e)),
        Err(_) => Err(format!(
            "health check timed out after {}s",
            HEALTH_CHECK_TIMEOUT.as_secs()
        )),
    };

    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let (status, body) = match probe {
        Ok(()) => (
            StatusCode::OK,
            HealthResponse {
                status: "healthy".to_string(),
                timestamp,
                upstream: "ok".to_string(),
                message: None,
            },
        ),
        Err(message) => {
            warn!(%message, "Upstream health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                HealthResponse {
                    status: "unhealthy".to_string(),
                    timestamp,
                    upstream: "error".to_string(),
                    message: Some(message),
                },
            )
        }
    };

    (status, Json(body)).into_response()
}
