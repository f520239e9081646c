//! Backend spatial reference detection.
//!
//! Learns the native reference system of an ArcGIS map service from its
//! JSON description and caches the answer per service path with a TTL.
//! Concurrent misses for the same path may each fetch; the last write wins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use wms_common::{normalize_crs, WmsError, WmsResult, DEFAULT_BACKEND_CRS};

use crate::client::UpstreamClient;
use crate::metrics;

/// Default time a detected reference system stays valid.
pub const DEFAULT_SR_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    sr: String,
    expires_at: Instant,
}

/// Snapshot of the cache, evaluated against the current clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
    pub ttl_secs: u64,
}

pub struct BackendSrDetector {
    client: Arc<dyn UpstreamClient>,
    cache: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    timeout: Duration,
}

impl BackendSrDetector {
    /// `timeout` bounds each metadata fetch.
    pub fn new(client: Arc<dyn UpstreamClient>, ttl: Duration, timeout: Duration) -> Self {
        info!(ttl_secs = ttl.as_secs(), "Initializing backend SR cache");
        Self {
            client,
            cache: RwLock::new(HashMap::new()),
            ttl,
            timeout,
        }
    }

    /// Canonical reference system tag of the service owning `service_path`.
    ///
    /// Metadata without a usable WKID resolves to `EPSG:3424`. Fetch failures
    /// are reported as [`WmsError::MetadataUnavailable`] and are not cached.
    pub async fn get_backend_sr(&self, service_path: &str) -> WmsResult<String> {
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(service_path) {
                if Instant::now() < entry.expires_at {
                    debug!(service_path, sr = %entry.sr, "Using cached backend SR");
                    metrics::record_sr_cache_lookup(true);
                    return Ok(entry.sr.clone());
                }
            }
        }
        metrics::record_sr_cache_lookup(false);

        info!(service_path, "Querying backend service metadata");
        let metadata =
            match tokio::time::timeout(self.timeout, self.client.get_service_metadata(service_path))
                .await
            {
                Ok(Ok(metadata)) => metadata,
                Ok(Err(WmsError::MetadataUnavailable(msg))) => {
                    return Err(WmsError::MetadataUnavailable(msg))
                }
                Ok(Err(e)) => return Err(WmsError::MetadataUnavailable(e.to_string())),
                Err(_) => {
                    return Err(WmsError::MetadataUnavailable(format!(
                        "metadata request timed out after {}s",
                        self.timeout.as_secs()
                    )))
                }
            };

        let sr = match metadata.wkid() {
            Some(wkid) => normalize_crs(&wkid.to_string()),
            None => {
                warn!(
                    service_path,
                    fallback_sr = DEFAULT_BACKEND_CRS,
                    "Could not determine backend SR from metadata, using fallback"
                );
                DEFAULT_BACKEND_CRS.to_string()
            }
        };

        {
            let mut cache = self.cache.write().await;
            cache.insert(
                service_path.to_string(),
                CacheEntry {
                    sr: sr.clone(),
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }

        info!(service_path, backend_sr = %sr, "Detected backend spatial reference system");
        Ok(sr)
    }

    /// Drop every cached entry.
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
        info!("Backend SR cache cleared");
    }

    pub async fn cache_stats(&self) -> CacheStats {
        let cache = self.cache.read().await;
        let now = Instant::now();
        let valid_entries = cache.values().filter(|e| now < e.expires_at).count();

        CacheStats {
            total_entries: cache.len(),
            valid_entries,
            expired_entries: cache.len() - valid_entries,
            ttl_secs: self.ttl.as_secs(),
        }
    }
}
