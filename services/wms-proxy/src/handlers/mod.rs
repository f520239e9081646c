//! HTTP request handlers.
//!
//! - `wms`: WMS GetCapabilities and GetMap
//! - `arcgis`: direct ArcGIS REST passthrough with bbox rewriting
//! - `health`: upstream health check
//! - `cache`: backend SR cache stats and clearing
//! - `metrics`: Prometheus exposition
//! - `common`: exception responses and the bounded upstream fetch

pub mod arcgis;
pub mod cache;
pub mod common;
pub mod health;
pub mod metrics;
pub mod wms;

pub use arcgis::arcgis_proxy_handler;
pub use cache::{sr_cache_clear_handler, sr_cache_stats_handler};
pub use common::wms_exception;
pub use health::{health_handler, HealthResponse};
pub use metrics::metrics_handler;
pub use wms::wms_handler;
