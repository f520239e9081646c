//! Helpers shared by the request handlers.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;
use wms_common::{WmsError, WmsResult};
use wms_protocol::{exception_for, SERVICE_EXCEPTION_CONTENT_TYPE};

use crate::client::UpstreamResponse;
use crate::metrics;
use crate::state::AppState;

/// WMS exception report for `err`, with the matching HTTP status.
pub fn wms_exception(err: &WmsError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match exception_for(err) {
        Ok(xml) => (
            status,
            [(header::CONTENT_TYPE, SERVICE_EXCEPTION_CONTENT_TYPE)],
            xml,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to serialize service exception");
            (status, err.to_string()).into_response()
        }
    }
}

/// GET `url` upstream, bounded by the configured request timeout.
pub async fn fetch_upstream(state: &AppState, url: &str) -> WmsResult<UpstreamResponse> {
    let timeout = state.config.request_timeout();
    let result = match tokio::time::timeout(timeout, state.client.get(url)).await {
        Ok(result) => result,
        Err(_) => Err(WmsError::UpstreamUnavailable(format!(
            "request timed out after {}s",
            timeout.as_secs()
        ))),
    };

    if let Err(e) = &result {
        error!(error = %e, "Failed to request from ArcGIS server");
        metrics::record_upstream_error();
    }
    result
}
