//! WMS endpoint: GetCapabilities and GetMap.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Extension, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{info, instrument, warn};
use wms_common::WmsError;
use wms_protocol::{build_capabilities_xml, build_export_url, WmsParams, CAPABILITIES_CONTENT_TYPE};

use super::common::{fetch_upstream, wms_exception};
use crate::metrics;
use crate::relay::relay_response;
use crate::state::AppState;

/// GET / and GET /wms
#[instrument(skip(state, query), fields(request = tracing::field::Empty))]
pub async fn wms_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let start = Instant::now();

    let params = match WmsParams::from_query_pairs(&query) {
        Ok(params) => params,
        Err(e) => {
            warn!(error = %e, "Rejected WMS request");
            metrics::record_request("invalid", start.elapsed());
            return wms_exception(&e);
        }
    };
    tracing::Span::current().record("request", params.request.as_str());

    let (kind, response) = if params.is_getcapabilities() {
        ("GetCapabilities", get_capabilities(&state))
    } else if params.is_getmap() {
        ("GetMap", get_map(&state, &params).await)
    } else {
        let err = WmsError::OperationNotSupported(params.request.clone());
        ("unsupported", wms_exception(&err))
    };

    let elapsed = start.elapsed();
    metrics::record_request(kind, elapsed);
    info!(
        request_type = kind,
        status = response.status().as_u16(),
        duration_secs = elapsed.as_secs_f64(),
        "Request completed"
    );
    response
}

fn get_capabilities(state: &AppState) -> Response {
    match build_capabilities_xml(&state.config.arcgis_base_url()) {
        Ok(xml) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, CAPABILITIES_CONTENT_TYPE),
                (header::CACHE_CONTROL, "max-age=3600"),
            ],
            xml,
        )
            .into_response(),
        Err(e) => wms_exception(&e),
    }
}

async fn get_map(state: &AppState, params: &WmsParams) -> Response {
    let service_path = &state.config.arcgis_service;
    let export = state.translator.translate(params, service_path).await;

    let url = match build_export_url(&state.config.arcgis_base_url(), service_path, &export) {
        Ok(url) => url,
        Err(e) => return wms_exception(&e),
    };

    info!(arcgis_url = %url, bbox = %export.bbox, size = %export.size, "Proxying to ArcGIS");

    match fetch_upstream(state, &url).await {
        Ok(upstream) => {
            info!(
                status_code = upstream.status,
                content_type = upstream.header("content-type").unwrap_or_default(),
                "Relaying upstream response"
            );
            relay_response(upstream)
        }
        Err(e) => wms_exception(&e),
    }
}
