//! ArcGIS REST MapServer `export` parameters.

use reqwest::Url;
use wms_common::crs::epsg_suffix;
use wms_common::{WmsError, WmsResult};

/// Resolution requested from the export operation.
pub const EXPORT_DPI: u32 = 96;

/// Parameters of an upstream `export` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportParams {
    pub bbox: String,
    /// `"W,H"` in pixels
    pub size: String,
    pub format: String,
    /// Full `EPSG:` tag; the URL builder emits only the numeric part
    pub bbox_sr: String,
    pub image_sr: String,
    pub layers: String,
    pub transparent: String,
    pub dpi: u32,
    pub f: String,
}

impl ExportParams {
    /// Export parameters with `dpi` and `f` at their fixed values.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bbox: String,
        width: i32,
        height: i32,
        wms_format: &str,
        sr: &str,
        wms_layers: &str,
        wms_transparent: &str,
    ) -> Self {
        Self {
            bbox,
            size: format!("{},{}", width, height),
            format: translate_format(wms_format).to_string(),
            bbox_sr: sr.to_string(),
            image_sr: sr.to_string(),
            layers: translate_layers(wms_layers),
            transparent: translate_transparent(wms_transparent).to_string(),
            dpi: EXPORT_DPI,
            f: "image".to_string(),
        }
    }
}

/// Map a WMS `FORMAT` to an ArcGIS export format. Unknown formats fall back
/// to `png32`.
pub fn translate_format(wms_format: &str) -> &'static str {
    match wms_format.to_lowercase().as_str() {
        "image/png" | "png" => "png32",
        "image/jpeg" | "jpeg" | "jpg" => "jpg",
        "image/gif" | "gif" => "gif",
        _ => "png32",
    }
}

/// Map WMS `LAYERS` (`"a, b"`) to an ArcGIS layer filter (`"show:a,show:b"`).
pub fn translate_layers(wms_layers: &str) -> String {
    let shown: Vec<String> = wms_layers
        .split(',')
        .map(str::trim)
        .filter(|layer| !layer.is_empty())
        .map(|layer| format!("show:{}", layer))
        .collect();

    if shown.is_empty() {
        "show:0".to_string()
    } else {
        shown.join(",")
    }
}

/// Map WMS `TRANSPARENT` to ArcGIS. Anything unrecognized means transparent.
pub fn translate_transparent(wms_transparent: &str) -> &'static str {
    match wms_transparent.to_lowercase().as_str() {
        "false" | "0" | "no" => "false",
        _ => "true",
    }
}

/// Build the upstream export URL from a base URL (`scheme://host`), a
/// service path and the export parameters.
pub fn build_export_url(
    base_url: &str,
    service_path: &str,
    params: &ExportParams,
) -> WmsResult<String> {
    let mut url = Url::parse(&format!("{}{}", base_url, service_path)).map_err(|e| {
        WmsError::InternalError(format!(
            "invalid upstream URL '{}{}': {}",
            base_url, service_path, e
        ))
    })?;

    url.query_pairs_mut()
        .append_pair("bbox", &params.bbox)
        .append_pair("size", &params.size)
        .append_pair("format", &params.format)
        .append_pair("bboxSR", epsg_suffix(&params.bbox_sr))
        .append_pair("imageSR", epsg_suffix(&params.image_sr))
        .append_pair("layers", &params.layers)
        .append_pair("transparent", &params.transparent)
        .append_pair("dpi", &params.dpi.to_string())
        .append_pair("f", &params.f);

    Ok(url.to_string())
}
