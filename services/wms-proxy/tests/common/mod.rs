//! Shared fixtures for the proxy integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use reqwest::Url;
use tower::ServiceExt;
use wms_common::{WmsError, WmsResult};
use wms_proxy::client::{ServiceMetadata, SpatialReference, UpstreamClient, UpstreamResponse};
use wms_proxy::config::{ProxyConfig, DEFAULT_ARCGIS_SERVICE};
use wms_proxy::state::AppState;

/// Lower Manhattan in Web Mercator.
pub const MANHATTAN_3857: &str = "-8238310.24,4969803.4,-8238016.75,4970096.9";

pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake image data";

/// Scriptable stand-in for the ArcGIS server.
pub struct MockUpstream {
    pub wkid: Option<i64>,
    pub metadata_fails: bool,
    pub upstream_fails: bool,
    /// Delay before `get` answers
    pub get_delay: Option<Duration>,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
    pub metadata_calls: AtomicUsize,
    pub requested_urls: Mutex<Vec<String>>,
}

impl MockUpstream {
    /// A server in NJ State Plane answering every GET with a PNG.
    pub fn new() -> Self {
        Self {
            wkid: Some(102711),
            metadata_fails: false,
            upstream_fails: false,
            get_delay: None,
            status: 200,
            content_type: Some("image/png".to_string()),
            body: Bytes::from_static(PNG_BYTES),
            metadata_calls: AtomicUsize::new(0),
            requested_urls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_wkid(wkid: Option<i64>) -> Self {
        Self {
            wkid,
            ..Self::new()
        }
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requested_urls.lock().unwrap().clone()
    }

    pub fn last_url(&self) -> Url {
        let urls = self.requested_urls();
        let last = urls.last().expect("no upstream request was made");
        Url::parse(last).unwrap()
    }
}

#[async_trait]
impl UpstreamClient for MockUpstream {
    async fn get(&self, url: &str) -> WmsResult<UpstreamResponse> {
        self.requested_urls.lock().unwrap().push(url.to_string());

        if let Some(delay) = self.get_delay {
            tokio::time::sleep(delay).await;
        }

        if self.upstream_fails {
            return Err(WmsError::UpstreamUnavailable("connection refused".to_string()));
        }

        let headers = self
            .content_type
            .iter()
            .map(|ct| ("Content-Type".to_string(), ct.clone()))
            .collect();
        let chunks: Vec<WmsResult<Bytes>> = vec![Ok(self.body.clone())];

        Ok(UpstreamResponse {
            status: self.status,
            headers,
            body: stream::iter(chunks).boxed(),
        })
    }

    async fn get_service_metadata(&self, _service_path: &str) -> WmsResult<ServiceMetadata> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);

        if self.metadata_fails {
            return Err(WmsError::MetadataUnavailable("metadata offline".to_string()));
        }

        Ok(ServiceMetadata {
            spatial_reference: Some(SpatialReference {
                wkid: self.wkid,
                latest_wkid: None,
                wkt: None,
            }),
            ..Default::default()
        })
    }
}

pub fn test_config() -> ProxyConfig {
    ProxyConfig {
        listen: "127.0.0.1:0".to_string(),
        arcgis_host: "gis.example.com".to_string(),
        arcgis_scheme: "https".to_string(),
        arcgis_service: DEFAULT_ARCGIS_SERVICE.to_string(),
        request_timeout_secs: 5,
        sr_cache_ttl_secs: 900,
        log_level: "info".to_string(),
        worker_threads: None,
    }
}

pub fn app(mock: Arc<MockUpstream>) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::with_client(test_config(), mock, None));
    (wms_proxy::router(state.clone()), state)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

pub async fn send(app: Router, method: Method, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri).await
}

/// First value of a query parameter in `url`.
pub fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Parse a comma-separated bbox into four numbers.
pub fn bbox_numbers(bbox: &str) -> Vec<f64> {
    bbox.split(',').map(|v| v.trim().parse().unwrap()).collect()
}

pub fn getmap_uri(bbox: &str, srs: &str) -> String {
    format!(
        "/wms?SERVICE=WMS&VERSION=1.1.1&REQUEST=GetMap&LAYERS=0&STYLES=&FORMAT=image/png\
         &TRANSPARENT=TRUE&SRS={}&BBOX={}&WIDTH=256&HEIGHT=256",
        srs, bbox
    )
}
