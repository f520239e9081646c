//! Prometheus metric names and recording helpers.
//!
//! Values go through the `metrics` facade; the binary installs the
//! Prometheus recorder and `/metrics` renders it. Without a recorder (unit
//! tests) these calls are no-ops.

use std::time::Duration;

use metrics::{counter, histogram};

pub const REQUESTS_TOTAL: &str = "wms_proxy_requests_total";
pub const UPSTREAM_ERRORS_TOTAL: &str = "wms_proxy_upstream_errors_total";
pub const BBOX_REPROJECTIONS_TOTAL: &str = "wms_proxy_bbox_reprojections_total";
pub const SR_CACHE_LOOKUPS_TOTAL: &str = "wms_proxy_sr_cache_lookups_total";
pub const REQUEST_DURATION_SECONDS: &str = "wms_proxy_request_duration_seconds";

/// Outcome of a bbox reprojection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReprojectionOutcome {
    /// Source and backend systems already match
    Skipped,
    Reprojected,
    /// Transform failed and the original bbox was kept
    Failed,
}

impl ReprojectionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReprojectionOutcome::Skipped => "skipped",
            ReprojectionOutcome::Reprojected => "reprojected",
            ReprojectionOutcome::Failed => "failed",
        }
    }
}

/// Record a handled request and how long it took.
pub fn record_request(request: &str, elapsed: Duration) {
    let label = request.to_string();
    counter!(REQUESTS_TOTAL, "request" => label.clone()).increment(1);
    histogram!(REQUEST_DURATION_SECONDS, "request" => label).record(elapsed.as_secs_f64());
}

pub fn record_upstream_error() {
    counter!(UPSTREAM_ERRORS_TOTAL).increment(1);
}

pub fn record_reprojection(outcome: ReprojectionOutcome) {
    counter!(BBOX_REPROJECTIONS_TOTAL, "outcome" => outcome.as_str()).increment(1);
}

pub fn record_sr_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!(SR_CACHE_LOOKUPS_TOTAL, "result" => result).increment(1);
}
