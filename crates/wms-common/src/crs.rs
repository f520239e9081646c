//! Coordinate Reference System identifiers and name normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// CRS assumed for a request that carries neither `CRS` nor `SRS`.
pub const DEFAULT_SOURCE_CRS: &str = "EPSG:3857";

/// CRS assumed for the backend when its metadata cannot be read.
pub const DEFAULT_BACKEND_CRS: &str = "EPSG:3424";

/// Reference systems the reprojection engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// Web Mercator (meters)
    Epsg3857,
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// NAD83 / New Jersey (US survey feet)
    Epsg3424,
}

impl CrsCode {
    pub const ALL: [CrsCode; 3] = [CrsCode::Epsg3857, CrsCode::Epsg4326, CrsCode::Epsg3424];

    /// Parse any accepted spelling of a supported CRS.
    ///
    /// The input is normalized first, so `"900913"`, `"epsg:3857"` and
    /// `"EPSG:3857"` all resolve to [`CrsCode::Epsg3857`].
    pub fn from_wms_string(s: &str) -> Result<Self, CrsParseError> {
        match normalize_crs(s).as_str() {
            "EPSG:3857" => Ok(CrsCode::Epsg3857),
            "EPSG:4326" => Ok(CrsCode::Epsg4326),
            "EPSG:3424" => Ok(CrsCode::Epsg3424),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// Numeric EPSG code.
    pub fn epsg(&self) -> u32 {
        match self {
            CrsCode::Epsg3857 => 3857,
            CrsCode::Epsg4326 => 4326,
            CrsCode::Epsg3424 => 3424,
        }
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

/// Canonicalize a spatial reference identifier.
///
/// Bare codes, legacy ESRI aliases and case variants of the supported systems
/// map onto their `EPSG:` tag. Any other bare integer gains an `EPSG:` prefix.
/// Everything else is returned trimmed with its original case, so this never
/// fails.
pub fn normalize_crs(input: &str) -> String {
    let original = input.trim();
    let upper = original.to_uppercase();

    match upper.as_str() {
        "3857" | "900913" | "EPSG:3857" | "EPSG:900913" => "EPSG:3857".to_string(),
        "4326" | "EPSG:4326" => "EPSG:4326".to_string(),
        "3424" | "102711" | "EPSG:3424" | "EPSG:102711" => "EPSG:3424".to_string(),
        _ if original.parse::<i64>().is_ok() => format!("EPSG:{}", original),
        _ => original.to_string(),
    }
}

/// Numeric part of an `EPSG:` tag, as ArcGIS expects in `bboxSR`/`imageSR`.
///
/// Tags without the prefix are returned unchanged.
pub fn epsg_suffix(crs: &str) -> &str {
    crs.strip_prefix("EPSG:").unwrap_or(crs)
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
