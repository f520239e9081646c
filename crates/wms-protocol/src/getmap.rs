//! WMS request parameter parsing and validation.

use wms_common::{WmsError, WmsResult, DEFAULT_SOURCE_CRS};

/// Parameters of an inbound WMS request.
///
/// Every textual field defaults to the empty string when the key is absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WmsParams {
    pub service: String,
    pub version: String,
    pub request: String,
    pub layers: String,
    pub styles: String,
    pub format: String,
    pub transparent: String,
    pub bgcolor: String,
    pub srs: String,
    pub crs: String,
    pub bbox: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// Look up a query key: an exact match wins, otherwise the first
/// case-insensitive match in query order.
fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .or_else(|| pairs.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)))
        .map(|(_, v)| v.as_str())
}

fn parse_dimension(pairs: &[(String, String)], key: &str) -> WmsResult<Option<i32>> {
    match lookup(pairs, key) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| WmsError::InvalidParameter {
                param: key.to_string(),
                message: format!("'{}' is not an integer", raw),
            }),
    }
}

impl WmsParams {
    /// Parse parameters from decoded query pairs.
    ///
    /// A present but non-integer `WIDTH`/`HEIGHT` is rejected for any request
    /// type. `GetMap` requests are additionally checked with
    /// [`WmsParams::validate_getmap`].
    pub fn from_query_pairs(pairs: &[(String, String)]) -> WmsResult<Self> {
        let text = |key: &str| lookup(pairs, key).unwrap_or_default().to_string();

        let params = Self {
            service: text("SERVICE"),
            version: text("VERSION"),
            request: text("REQUEST"),
            layers: text("LAYERS"),
            styles: text("STYLES"),
            format: text("FORMAT"),
            transparent: text("TRANSPARENT"),
            bgcolor: text("BGCOLOR"),
            srs: text("SRS"),
            crs: text("CRS"),
            bbox: text("BBOX"),
            width: parse_dimension(pairs, "WIDTH")?,
            height: parse_dimension(pairs, "HEIGHT")?,
        };

        if params.is_getmap() {
            params.validate_getmap()?;
        }

        Ok(params)
    }

    pub fn is_getmap(&self) -> bool {
        self.request.eq_ignore_ascii_case("GetMap")
    }

    pub fn is_getcapabilities(&self) -> bool {
        self.request.eq_ignore_ascii_case("GetCapabilities")
    }

    /// Check the fields a GetMap request cannot do without.
    pub fn validate_getmap(&self) -> WmsResult<()> {
        if self.bbox.is_empty() {
            return Err(WmsError::MissingParameter("BBOX".to_string()));
        }

        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => {}
            (w, h) => {
                return Err(WmsError::InvalidDimensions(format!(
                    "WIDTH and HEIGHT must be positive integers (got {}x{})",
                    w.map_or_else(|| "none".to_string(), |v| v.to_string()),
                    h.map_or_else(|| "none".to_string(), |v| v.to_string()),
                )))
            }
        }

        if self.layers.is_empty() {
            return Err(WmsError::MissingParameter("LAYERS".to_string()));
        }

        Ok(())
    }

    /// The reference system the bbox is expressed in: `CRS` (1.3.0), then
    /// `SRS` (1.1.1), then Web Mercator.
    pub fn source_srs(&self) -> &str {
        if !self.crs.is_empty() {
            &self.crs
        } else if !self.srs.is_empty() {
            &self.srs
        } else {
            DEFAULT_SOURCE_CRS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(query: &[(&str, &str)]) -> Vec<(String, String)> {
        query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn getmap() -> Vec<(String, String)> {
        pairs(&[
            ("SERVICE", "WMS"),
            ("REQUEST", "GetMap"),
            ("LAYERS", "0"),
            ("BBOX", "-8238310.24,4969803.4,-8238016.75,4970096.9"),
            ("WIDTH", "256"),
            ("HEIGHT", "256"),
            ("SRS", "EPSG:3857"),
        ])
    }

    #[test]
    fn test_parse_valid_getmap() {
        let params = WmsParams::from_query_pairs(&getmap()).unwrap();
        assert!(params.is_getmap());
        assert_eq!(params.layers, "0");
        assert_eq!(params.width, Some(256));
        assert_eq!(params.height, Some(256));
        assert_eq!(params.source_srs(), "EPSG:3857");
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let q = pairs(&[
            ("request", "getmap"),
            ("Layers", "1,2"),
            ("bbox", "0,0,1,1"),
            ("width", "10"),
            ("HeIgHt", "20"),
        ]);
        let params = WmsParams::from_query_pairs(&q).unwrap();
        assert!(params.is_getmap());
        assert_eq!(params.layers, "1,2");
        assert_eq!(params.height, Some(20));
    }

    #[test]
    fn test_exact_key_wins_over_case_variant() {
        let q = pairs(&[("layers", "lower"), ("LAYERS", "upper")]);
        let params = WmsParams::from_query_pairs(&q).unwrap();
        assert_eq!(params.layers, "upper");
    }

    #[test]
    fn test_first_case_insensitive_match_wins() {
        let q = pairs(&[("layers", "first"), ("Layers", "second")]);
        let params = WmsParams::from_query_pairs(&q).unwrap();
        assert_eq!(params.layers, "first");
    }

    #[test]
    fn test_missing_bbox() {
        let mut q = getmap();
        q.retain(|(k, _)| k != "BBOX");
        let err = WmsParams::from_query_pairs(&q).unwrap_err();
        assert!(matches!(err, WmsError::MissingParameter(ref p) if p == "BBOX"));
        assert_eq!(err.wms_exception_code(), "MissingParameterValue");
    }

    #[test]
    fn test_zero_or_missing_dimensions() {
        let mut q = getmap();
        q.retain(|(k, _)| k != "WIDTH");
        assert!(matches!(
            WmsParams::from_query_pairs(&q).unwrap_err(),
            WmsError::InvalidDimensions(_)
        ));

        let mut q = getmap();
        for (k, v) in q.iter_mut() {
            if k == "HEIGHT" {
                *v = "0".to_string();
            }
        }
        assert!(matches!(
            WmsParams::from_query_pairs(&q).unwrap_err(),
            WmsError::InvalidDimensions(_)
        ));
    }

    #[test]
    fn test_negative_dimension() {
        let mut q = getmap();
        for (k, v) in q.iter_mut() {
            if k == "WIDTH" {
                *v = "-5".to_string();
            }
        }
        assert!(matches!(
            WmsParams::from_query_pairs(&q).unwrap_err(),
            WmsError::InvalidDimensions(_)
        ));
    }

    #[test]
    fn test_non_integer_dimension_for_any_request() {
        let q = pairs(&[("REQUEST", "GetCapabilities"), ("WIDTH", "abc")]);
        let err = WmsParams::from_query_pairs(&q).unwrap_err();
        match err {
            WmsError::InvalidParameter { param, .. } => assert_eq!(param, "WIDTH"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_layers() {
        let mut q = getmap();
        q.retain(|(k, _)| k != "LAYERS");
        let err = WmsParams::from_query_pairs(&q).unwrap_err();
        assert!(matches!(err, WmsError::MissingParameter(ref p) if p == "LAYERS"));
    }

    #[test]
    fn test_getcapabilities_skips_getmap_checks() {
        let q = pairs(&[("SERVICE", "WMS"), ("REQUEST", "GetCapabilities")]);
        let params = WmsParams::from_query_pairs(&q).unwrap();
        assert!(params.is_getcapabilities());
        assert_eq!(params.width, None);
    }

    #[test]
    fn test_source_srs_precedence() {
        let mut params = WmsParams::default();
        assert_eq!(params.source_srs(), "EPSG:3857");
        params.srs = "EPSG:4326".to_string();
        assert_eq!(params.source_srs(), "EPSG:4326");
        params.crs = "EPSG:3424".to_string();
        assert_eq!(params.source_srs(), "EPSG:3424");
    }
}
