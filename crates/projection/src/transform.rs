//! Registry of point transforms between the supported CRSs.
//!
//! The table is built once and is read-only afterwards, so a single
//! [`CoordinateTransformer`] can be shared across request tasks without
//! locking.

use std::collections::HashMap;
use std::fmt;

use wms_common::{normalize_crs, BoundingBox, CrsCode, WmsError, WmsResult};

use crate::mercator::{geographic_to_web_mercator, web_mercator_to_geographic};
use crate::transverse_mercator::TransverseMercator;

/// A pure mapping of one coordinate pair between two CRSs.
pub type TransformFn = Box<dyn Fn(f64, f64) -> (f64, f64) + Send + Sync>;

/// Pairwise transform table keyed by (source, target).
pub struct CoordinateTransformer {
    transforms: HashMap<(CrsCode, CrsCode), TransformFn>,
}

impl CoordinateTransformer {
    /// Build the table with every supported pair, identities included.
    pub fn new() -> Self {
        let mut ct = Self {
            transforms: HashMap::new(),
        };

        let nj = TransverseMercator::new_jersey_ftus();

        // Web Mercator <-> WGS84
        ct.register(CrsCode::Epsg3857, CrsCode::Epsg4326, Box::new(web_mercator_to_geographic));
        ct.register(CrsCode::Epsg4326, CrsCode::Epsg3857, Box::new(geographic_to_web_mercator));

        // WGS84 <-> NAD83 / New Jersey (ftUS)
        {
            let nj = nj.clone();
            ct.register(
                CrsCode::Epsg4326,
                CrsCode::Epsg3424,
                Box::new(move |lon, lat| nj.forward(lon, lat)),
            );
        }
        {
            let nj = nj.clone();
            ct.register(
                CrsCode::Epsg3424,
                CrsCode::Epsg4326,
                Box::new(move |e, n| nj.inverse(e, n)),
            );
        }

        // Web Mercator <-> NAD83 / New Jersey, chained through WGS84
        {
            let nj = nj.clone();
            ct.register(
                CrsCode::Epsg3857,
                CrsCode::Epsg3424,
                Box::new(move |x, y| {
                    let (lon, lat) = web_mercator_to_geographic(x, y);
                    nj.forward(lon, lat)
                }),
            );
        }
        ct.register(
            CrsCode::Epsg3424,
            CrsCode::Epsg3857,
            Box::new(move |e, n| {
                let (lon, lat) = nj.inverse(e, n);
                geographic_to_web_mercator(lon, lat)
            }),
        );

        for code in CrsCode::ALL {
            ct.register(code, code, Box::new(|x, y| (x, y)));
        }

        ct
    }

    fn register(&mut self, from: CrsCode, to: CrsCode, transform: TransformFn) {
        self.transforms.insert((from, to), transform);
    }

    fn lookup(&self, from: &str, to: &str) -> WmsResult<&TransformFn> {
        let unsupported = || WmsError::UnsupportedTransform {
            from: normalize_crs(from),
            to: normalize_crs(to),
        };

        let from_code = CrsCode::from_wms_string(from).map_err(|_| unsupported())?;
        let to_code = CrsCode::from_wms_string(to).map_err(|_| unsupported())?;

        self.transforms
            .get(&(from_code, to_code))
            .ok_or_else(unsupported)
    }

    /// Transform a single point. CRS names may use any accepted alias.
    pub fn transform_point(&self, x: f64, y: f64, from: &str, to: &str) -> WmsResult<(f64, f64)> {
        let transform = self.lookup(from, to)?;
        Ok(transform(x, y))
    }

    /// Transform the two diagonal corners of a bounding box.
    ///
    /// Box edges are not resampled, so under strong shear the result may not
    /// tightly bound the true reprojected region.
    pub fn transform_bounding_box(
        &self,
        bbox: &BoundingBox,
        from: &str,
        to: &str,
    ) -> WmsResult<BoundingBox> {
        let transform = self.lookup(from, to)?;
        let (min_x, min_y) = transform(bbox.min_x, bbox.min_y);
        let (max_x, max_y) = transform(bbox.max_x, bbox.max_y);
        Ok(BoundingBox::new(min_x, min_y, max_x, max_y))
    }

    /// Parse a WMS bbox string, transform it and format the result.
    pub fn transform_bbox(&self, bbox: &str, from: &str, to: &str) -> WmsResult<String> {
        let parsed = BoundingBox::from_wms_string(bbox)?;
        let transformed = self.transform_bounding_box(&parsed, from, to)?;
        Ok(transformed.to_wms_string())
    }
}

impl Default for CoordinateTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CoordinateTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<String> = self
            .transforms
            .keys()
            .map(|(from, to)| format!("{}->{}", from, to))
            .collect();
        pairs.sort();
        f.debug_struct("CoordinateTransformer")
            .field("transforms", &pairs)
            .finish()
    }
}
