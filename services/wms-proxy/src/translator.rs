//! WMS to ArcGIS export translation.
//!
//! Decides whether a bbox has to be reprojected into the backend's native
//! reference system and builds the export parameters. Detection and
//! reprojection failures degrade to defaults; translation itself never fails.

use std::sync::Arc;

use projection::CoordinateTransformer;
use tracing::{debug, info, warn};
use wms_common::{normalize_crs, DEFAULT_BACKEND_CRS};
use wms_protocol::{ExportParams, WmsParams};

use crate::metrics::{self, ReprojectionOutcome};
use crate::sr_detector::BackendSrDetector;

/// A bbox resolved against the backend reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBbox {
    /// Bbox to send upstream (the original string unless reprojected)
    pub bbox: String,
    /// Normalized source reference system
    pub source_sr: String,
    /// Normalized backend reference system
    pub target_sr: String,
    pub outcome: ReprojectionOutcome,
}

pub struct Translator {
    transformer: Arc<CoordinateTransformer>,
    detector: Arc<BackendSrDetector>,
}

impl Translator {
    pub fn new(transformer: Arc<CoordinateTransformer>, detector: Arc<BackendSrDetector>) -> Self {
        Self {
            transformer,
            detector,
        }
    }

    /// Backend reference system, or `EPSG:3424` when detection fails.
    pub async fn backend_sr(&self, service_path: &str) -> String {
        match self.detector.get_backend_sr(service_path).await {
            Ok(sr) => sr,
            Err(e) => {
                warn!(
                    error = %e,
                    service_path,
                    fallback_sr = DEFAULT_BACKEND_CRS,
                    "Failed to detect backend SR, using fallback"
                );
                DEFAULT_BACKEND_CRS.to_string()
            }
        }
    }

    /// Reproject `bbox` from `source_sr` into the backend system of
    /// `service_path` when the two differ.
    pub async fn resolve_bbox(&self, bbox: &str, source_sr: &str, service_path: &str) -> ResolvedBbox {
        let source_sr = normalize_crs(source_sr);
        let target_sr = self.backend_sr(service_path).await;

        let (bbox, outcome) = if source_sr == target_sr {
            debug!(sr = %source_sr, "Bbox already in backend SR");
            (bbox.to_string(), ReprojectionOutcome::Skipped)
        } else {
            match self.transformer.transform_bbox(bbox, &source_sr, &target_sr) {
                Ok(transformed) => {
                    info!(
                        original_bbox = bbox,
                        transformed_bbox = %transformed,
                        from_crs = %source_sr,
                        to_crs = %target_sr,
                        "Transformed coordinates"
                    );
                    (transformed, ReprojectionOutcome::Reprojected)
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        original_bbox = bbox,
                        from_crs = %source_sr,
                        to_crs = %target_sr,
                        "Coordinate transformation failed, using original bbox"
                    );
                    (bbox.to_string(), ReprojectionOutcome::Failed)
                }
            }
        };

        metrics::record_reprojection(outcome);

        ResolvedBbox {
            bbox,
            source_sr,
            target_sr,
            outcome,
        }
    }

    /// Map validated GetMap parameters onto an export call against
    /// `service_path`.
    pub async fn translate(&self, params: &WmsParams, service_path: &str) -> ExportParams {
        let resolved = self
            .resolve_bbox(&params.bbox, params.source_srs(), service_path)
            .await;

        ExportParams::new(
            resolved.bbox,
            params.width.unwrap_or_default(),
            params.height.unwrap_or_default(),
            &params.format,
            &resolved.target_sr,
            &params.layers,
            &params.transparent,
        )
    }
}
