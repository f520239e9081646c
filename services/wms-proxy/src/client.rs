//! HTTP client for the upstream ArcGIS REST server.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use wms_common::{WmsError, WmsResult};

pub const USER_AGENT: &str = "WMS-Proxy/1.0";

const IMAGE_ACCEPT: &str = "image/png,image/jpeg,image/gif,*/*";

/// A response from the upstream server with its body still streaming.
pub struct UpstreamResponse {
    pub status: u16,
    /// Header name/value pairs in the order received
    pub headers: Vec<(String, String)>,
    pub body: BoxStream<'static, WmsResult<Bytes>>,
}

impl UpstreamResponse {
    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for UpstreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Spatial reference block of a MapServer description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    #[serde(default)]
    pub wkid: Option<i64>,
    #[serde(default)]
    pub latest_wkid: Option<i64>,
    #[serde(default)]
    pub wkt: Option<String>,
}

impl SpatialReference {
    /// `latestWkid` when set and non-zero, else `wkid` when non-zero.
    pub fn effective_wkid(&self) -> Option<i64> {
        self.latest_wkid
            .filter(|&id| id != 0)
            .or_else(|| self.wkid.filter(|&id| id != 0))
    }
}

/// ArcGIS reports `supportedQueryFormats` either as a comma-separated
/// string or as an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryFormats {
    List(String),
    Array(Vec<String>),
}

/// The parts of a MapServer JSON description (`?f=json`) the proxy reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceMetadata {
    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,
    #[serde(default)]
    pub capabilities: Option<String>,
    #[serde(default)]
    pub max_record_count: Option<i64>,
    #[serde(default)]
    pub supported_query_formats: Option<QueryFormats>,
}

impl ServiceMetadata {
    pub fn wkid(&self) -> Option<i64> {
        self.spatial_reference
            .as_ref()
            .and_then(SpatialReference::effective_wkid)
    }
}

/// Upstream operations the proxy needs.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Issue a GET and return the response with a streaming body.
    ///
    /// Non-2xx statuses are not errors; only transport failures are.
    async fn get(&self, url: &str) -> WmsResult<UpstreamResponse>;

    /// Fetch the JSON description of the service that owns `service_path`.
    async fn get_service_metadata(&self, service_path: &str) -> WmsResult<ServiceMetadata>;
}

/// Strip a trailing `/export` operation to get the service root.
pub fn service_root(service_path: &str) -> &str {
    service_path.strip_suffix("/export").unwrap_or(service_path)
}

/// [`UpstreamClient`] backed by reqwest.
pub struct ArcGisClient {
    client: Client,
    base_url: String,
}

impl ArcGisClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> WmsResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| WmsError::InternalError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl UpstreamClient for ArcGisClient {
    #[instrument(skip(self))]
    async fn get(&self, url: &str) -> WmsResult<UpstreamResponse> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, IMAGE_ACCEPT)
            .send()
            .await
            .map_err(|e| WmsError::UpstreamUnavailable(format!("request failed: {}", e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        debug!(status, "Upstream responded");

        let body = response
            .bytes_stream()
            .map(|chunk| {
                chunk.map_err(|e| WmsError::UpstreamUnavailable(format!("body read failed: {}", e)))
            })
            .boxed();

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }

    #[instrument(skip(self))]
    async fn get_service_metadata(&self, service_path: &str) -> WmsResult<ServiceMetadata> {
        let url = format!("{}{}?f=json", self.base_url, service_root(service_path));

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| WmsError::MetadataUnavailable(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(WmsError::MetadataUnavailable(format!(
                "metadata request failed with status: {}",
                status.as_u16()
            )));
        }

        response
            .json::<ServiceMetadata>()
            .await
            .map_err(|e| WmsError::MetadataUnavailable(format!("invalid metadata response: {}", e)))
    }
}
