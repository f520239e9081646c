//! Application state shared across handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use projection::CoordinateTransformer;
use tracing::info;
use wms_common::WmsResult;

use crate::client::{ArcGisClient, UpstreamClient};
use crate::config::ProxyConfig;
use crate::sr_detector::BackendSrDetector;
use crate::translator::Translator;

pub struct AppState {
    pub config: ProxyConfig,
    pub client: Arc<dyn UpstreamClient>,
    pub detector: Arc<BackendSrDetector>,
    pub translator: Translator,
    /// Renders `/metrics`; absent when no recorder was installed
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// State talking to the ArcGIS server named in `config`.
    pub fn new(config: ProxyConfig, prometheus: Option<PrometheusHandle>) -> WmsResult<Self> {
        let client = ArcGisClient::new(config.arcgis_base_url(), config.request_timeout())?;
        info!(
            arcgis_base_url = client.base_url(),
            arcgis_service = %config.arcgis_service,
            "ArcGIS client initialized"
        );
        Ok(Self::with_client(config, Arc::new(client), prometheus))
    }

    /// State around an arbitrary upstream client.
    pub fn with_client(
        config: ProxyConfig,
        client: Arc<dyn UpstreamClient>,
        prometheus: Option<PrometheusHandle>,
    ) -> Self {
        let detector = Arc::new(BackendSrDetector::new(
            client.clone(),
            config.sr_cache_ttl(),
            config.request_timeout(),
        ));
        let translator = Translator::new(Arc::new(CoordinateTransformer::new()), detector.clone());

        Self {
            config,
            client,
            detector,
            translator,
            prometheus,
        }
    }
}
