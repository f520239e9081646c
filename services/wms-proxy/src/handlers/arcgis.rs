//! Direct ArcGIS REST passthrough.
//!
//! Requests under `/arcgis/` are forwarded to the same path upstream. When a
//! request carries both `bbox` and `bboxSR` in a system other than the
//! backend's, both are rewritten; all other parameters pass unchanged.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Extension, Query},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use reqwest::Url;
use tracing::{error, info, instrument};
use wms_common::crs::epsg_suffix;
use wms_common::{WmsError, WmsResult};

use super::common::fetch_upstream;
use crate::metrics::{self, ReprojectionOutcome};
use crate::relay::relay_response;
use crate::state::AppState;

/// GET /arcgis/*path
#[instrument(skip(state, query), fields(path = %uri.path()))]
pub async fn arcgis_proxy_handler(
    Extension(state): Extension<Arc<AppState>>,
    uri: Uri,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let start = Instant::now();
    let service_path = uri.path();

    let query = rewrite_bbox(&state, service_path, query).await;

    let target = match target_url(&state.config.arcgis_base_url(), service_path, &query) {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, "Failed to build target URL");
            return (StatusCode::BAD_REQUEST, "Invalid request parameters").into_response();
        }
    };

    info!(target_url = %target, "Proxying to ArcGIS");

    let response = match fetch_upstream(&state, &target).await {
        Ok(upstream) => relay_response(upstream),
        Err(_) => (StatusCode::BAD_GATEWAY, "Upstream server error").into_response(),
    };

    let elapsed = start.elapsed();
    metrics::record_request("arcgis", elapsed);
    info!(
        status_code = response.status().as_u16(),
        duration_secs = elapsed.as_secs_f64(),
        "ArcGIS proxy request completed"
    );
    response
}

/// Reproject `bbox` into the backend system and update `bboxSR` to match.
async fn rewrite_bbox(
    state: &AppState,
    service_path: &str,
    mut query: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let value = |key: &str| {
        query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .filter(|v| !v.is_empty())
    };

    let (Some(bbox), Some(bbox_sr)) = (value("bbox"), value("bboxSR")) else {
        return query;
    };

    let resolved = state
        .translator
        .resolve_bbox(&bbox, &bbox_sr, service_path)
        .await;

    if resolved.outcome == ReprojectionOutcome::Reprojected {
        let sr = epsg_suffix(&resolved.target_sr).to_string();
        for (key, value) in query.iter_mut() {
            match key.as_str() {
                "bbox" => *value = resolved.bbox.clone(),
                "bboxSR" => *value = sr.clone(),
                _ => {}
            }
        }
    }

    query
}

fn target_url(base_url: &str, path: &str, query: &[(String, String)]) -> WmsResult<String> {
    let mut url =
        Url::parse(&format!("{}{}", base_url, path)).map_err(|e| WmsError::InvalidParameter {
            param: "path".to_string(),
            message: e.to_string(),
        })?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_url_keeps_path_and_order() {
        let query = vec![
            ("f".to_string(), "json".to_string()),
            ("bbox".to_string(), "1,2,3,4".to_string()),
        ];
        let url = target_url("https://gis.example.com", "/arcgis/rest/services/A/MapServer/export", &query)
            .unwrap();
        assert_eq!(
            url,
            "https://gis.example.com/arcgis/rest/services/A/MapServer/export?f=json&bbox=1%2C2%2C3%2C4"
        );
    }

    #[test]
    fn test_target_url_without_query() {
        let url = target_url("http://h", "/arcgis/rest/services", &[]).unwrap();
        assert_eq!(url, "http://h/arcgis/rest/services");
    }
}
