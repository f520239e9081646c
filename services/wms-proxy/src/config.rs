//! Proxy configuration from command-line flags and environment variables.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

use crate::sr_detector::DEFAULT_SR_CACHE_TTL;

pub const DEFAULT_ARCGIS_SERVICE: &str =
    "/arcgis/rest/services/Features/Environmental_admin/MapServer/export";

/// WMS to ArcGIS REST proxy
#[derive(Parser, Debug, Clone)]
#[command(name = "wms-proxy")]
#[command(about = "Translates OGC WMS requests into ArcGIS REST MapServer export calls")]
pub struct ProxyConfig {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "PROXY_LISTEN_ADDR")]
    pub listen: String,

    /// ArcGIS server host name (optionally with port)
    #[arg(long, default_value = "localhost", env = "ARCGIS_HOST")]
    pub arcgis_host: String,

    /// Scheme used to reach the ArcGIS server (http or https)
    #[arg(long, default_value = "https", env = "ARCGIS_SCHEME")]
    pub arcgis_scheme: String,

    /// Path of the MapServer export operation served to WMS clients
    #[arg(long, default_value = DEFAULT_ARCGIS_SERVICE, env = "ARCGIS_SERVICE")]
    pub arcgis_service: String,

    /// Upstream request timeout in seconds
    #[arg(long, default_value_t = 30, env = "REQUEST_TIMEOUT")]
    pub request_timeout_secs: u64,

    /// How long a detected backend spatial reference stays cached
    #[arg(long, default_value_t = DEFAULT_SR_CACHE_TTL.as_secs(), env = "SR_CACHE_TTL_SECS")]
    pub sr_cache_ttl_secs: u64,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Number of worker threads
    #[arg(long, env = "PROXY_WORKER_THREADS")]
    pub worker_threads: Option<usize>,
}

impl ProxyConfig {
    /// Reject settings the proxy cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.arcgis_host.trim().is_empty() {
            bail!("ARCGIS_HOST is required");
        }
        if self.arcgis_scheme != "http" && self.arcgis_scheme != "https" {
            bail!(
                "ARCGIS_SCHEME must be 'http' or 'https' (got '{}')",
                self.arcgis_scheme
            );
        }
        if self.request_timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT must be at least 1 second");
        }
        Ok(())
    }

    /// `scheme://host` of the ArcGIS server.
    pub fn arcgis_base_url(&self) -> String {
        format!("{}://{}", self.arcgis_scheme, self.arcgis_host)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn sr_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.sr_cache_ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProxyConfig {
        ProxyConfig {
            listen: "127.0.0.1:0".to_string(),
            arcgis_host: "gis.example.com".to_string(),
            arcgis_scheme: "https".to_string(),
            arcgis_service: DEFAULT_ARCGIS_SERVICE.to_string(),
            request_timeout_secs: 30,
            sr_cache_ttl_secs: 900,
            log_level: "info".to_string(),
            worker_threads: None,
        }
    }

    #[test]
    fn test_base_url() {
        assert_eq!(config().arcgis_base_url(), "https://gis.example.com");
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
        assert_eq!(config().request_timeout(), Duration::from_secs(30));
        assert_eq!(config().sr_cache_ttl(), Duration::from_secs(900));
    }

    #[test]
    fn test_cache_ttl_defaults_to_detector_ttl() {
        let cfg = ProxyConfig::try_parse_from(["wms-proxy"]).unwrap();
        assert_eq!(cfg.sr_cache_ttl(), DEFAULT_SR_CACHE_TTL);
    }

    #[test]
    fn test_rejects_empty_host() {
        let mut cfg = config();
        cfg.arcgis_host = "  ".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_scheme() {
        let mut cfg = config();
        cfg.arcgis_scheme = "ftp".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let mut cfg = config();
        cfg.request_timeout_secs = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_flags_parse() {
        let cfg = ProxyConfig::try_parse_from([
            "wms-proxy",
            "--arcgis-host",
            "maps.internal:6443",
            "--arcgis-scheme",
            "http",
            "--request-timeout-secs",
            "5",
        ])
        .unwrap();
        assert_eq!(cfg.arcgis_base_url(), "http://maps.internal:6443");
        assert_eq!(cfg.request_timeout_secs, 5);
    }
}
