//! Transverse Mercator projection on an ellipsoid.
//!
//! Uses the truncated series expansions found in Snyder, "Map Projections -
//! A Working Manual" (USGS PP 1395), eqs. 8-9 to 8-25: the meridional arc to
//! sixth order in eccentricity and the easting/northing series to the sixth
//! power of the longitude term. Accuracy is well below a millimeter within a
//! few degrees of the central meridian, which covers a US state plane zone.
//! It is not meant for global use.
//!
//! The projection parameters include:
//! - Latitude of origin (lat0) and central meridian (lon0)
//! - Scale factor on the central meridian (k0)
//! - False easting / northing, in output units
//! - Output units per meter (e.g. US survey feet)

use std::f64::consts::PI;

/// GRS80 semi-major axis (meters).
pub const GRS80_A: f64 = 6378137.0;

/// GRS80 flattening.
pub const GRS80_F: f64 = 1.0 / 298.257222101;

/// US survey feet per meter (1200/3937 m per foot, truncated).
pub const US_SURVEY_FEET_PER_METER: f64 = 3.280833333;

/// Transverse Mercator projection parameters.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    /// Semi-major axis (meters)
    pub a: f64,
    /// Latitude of origin in radians
    pub lat0: f64,
    /// Central meridian in radians
    pub lon0: f64,
    /// Scale factor on the central meridian
    pub k0: f64,
    /// False easting in output units
    pub false_easting: f64,
    /// False northing in output units
    pub false_northing: f64,
    /// Output units per meter
    pub units_per_meter: f64,
    /// First eccentricity squared
    e2: f64,
    /// Second eccentricity squared
    ep2: f64,
    /// Meridional arc at the latitude of origin (meters)
    m0: f64,
}

impl TransverseMercator {
    /// Create a projection from its defining parameters.
    ///
    /// # Arguments
    /// * `a` - Semi-major axis (meters)
    /// * `f` - Flattening
    /// * `lat0_deg` - Latitude of origin (degrees)
    /// * `lon0_deg` - Central meridian (degrees)
    /// * `k0` - Scale factor
    /// * `false_easting` / `false_northing` - In output units
    /// * `units_per_meter` - Output units per meter
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        a: f64,
        f: f64,
        lat0_deg: f64,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
        units_per_meter: f64,
    ) -> Self {
        let to_rad = PI / 180.0;
        let e2 = 2.0 * f - f * f;
        let ep2 = e2 / (1.0 - e2);
        let lat0 = lat0_deg * to_rad;

        let mut tm = Self {
            a,
            lat0,
            lon0: lon0_deg * to_rad,
            k0,
            false_easting,
            false_northing,
            units_per_meter,
            e2,
            ep2,
            m0: 0.0,
        };
        tm.m0 = tm.meridional_arc(lat0);
        tm
    }

    /// NAD83 / New Jersey (ftUS), EPSG:3424.
    ///
    /// `+proj=tmerc +lat_0=38.8333333333333 +lon_0=-74.5 +k=0.9999
    /// +x_0=492125 +y_0=0 +ellps=GRS80 +units=us-ft`
    pub fn new_jersey_ftus() -> Self {
        Self::new(
            GRS80_A,
            GRS80_F,
            38.0 + 50.0 / 60.0, // 38°50'
            -74.5,
            0.9999,
            492125.0,
            0.0,
            US_SURVEY_FEET_PER_METER,
        )
    }

    /// Distance along the meridian from the equator to `lat` (radians), in meters.
    fn meridional_arc(&self, lat: f64) -> f64 {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        self.a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
    }

    /// Project geographic coordinates (degrees) to easting/northing in output units.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let to_rad = PI / 180.0;
        let lat = lat_deg * to_rad;
        let lon = lon_deg * to_rad;

        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let tan_lat = lat.tan();

        let n = self.a / (1.0 - self.e2 * sin_lat * sin_lat).sqrt();
        let t = tan_lat * tan_lat;
        let c = self.ep2 * cos_lat * cos_lat;
        let a = cos_lat * (lon - self.lon0);
        let m = self.meridional_arc(lat);

        let a2 = a * a;
        let a3 = a2 * a;
        let a4 = a2 * a2;
        let a5 = a4 * a;
        let a6 = a4 * a2;

        let x = self.k0
            * n
            * (a + (1.0 - t + c) * a3 / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * a5 / 120.0);

        let y = self.k0
            * (m - self.m0
                + n * tan_lat
                    * (a2 / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2) * a6 / 720.0));

        (
            x * self.units_per_meter + self.false_easting,
            y * self.units_per_meter + self.false_northing,
        )
    }

    /// Unproject easting/northing in output units to geographic (lon, lat) degrees.
    pub fn inverse(&self, easting: f64, northing: f64) -> (f64, f64) {
        let to_deg = 180.0 / PI;

        let x = (easting - self.false_easting) / self.units_per_meter;
        let y = (northing - self.false_northing) / self.units_per_meter;

        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;

        // Footpoint latitude
        let m = self.m0 + y / self.k0;
        let mu = m / (self.a * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

        let sqrt_1_e2 = (1.0 - e2).sqrt();
        let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);
        let e1_2 = e1 * e1;
        let e1_3 = e1_2 * e1;
        let e1_4 = e1_2 * e1_2;

        let lat1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

        let sin_lat1 = lat1.sin();
        let cos_lat1 = lat1.cos();
        let tan_lat1 = lat1.tan();
        let w = 1.0 - e2 * sin_lat1 * sin_lat1;

        let n1 = self.a / w.sqrt();
        let r1 = self.a * (1.0 - e2) / w.powf(1.5);
        let t1 = tan_lat1 * tan_lat1;
        let c1 = self.ep2 * cos_lat1 * cos_lat1;
        let d = x / (n1 * self.k0);

        let d2 = d * d;
        let d3 = d2 * d;
        let d4 = d2 * d2;
        let d5 = d4 * d;
        let d6 = d4 * d2;

        let lat = lat1
            - (n1 * tan_lat1 / r1)
                * (d2 / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * self.ep2) * d4 / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * self.ep2
                        - 3.0 * c1 * c1)
                        * d6
                        / 720.0);

        let lon = self.lon0
            + (d - (1.0 + 2.0 * t1 + c1) * d3 / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * self.ep2 + 24.0 * t1 * t1)
                    * d5
                    / 120.0)
                / cos_lat1;

        (lon * to_deg, lat * to_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_false_origin() {
        let tm = TransverseMercator::new_jersey_ftus();
        let (e, n) = tm.forward(-74.5, 38.0 + 50.0 / 60.0);
        assert!((e - 492125.0).abs() < 1e-6, "easting = {}", e);
        assert!(n.abs() < 1e-6, "northing = {}", n);
    }

    #[test]
    fn test_central_meridian_has_no_easting_offset() {
        let tm = TransverseMercator::new_jersey_ftus();
        let (e, n) = tm.forward(-74.5, 40.0);
        assert!((e - 492125.0).abs() < 1e-6);
        // ~1.1667 degrees of latitude north of the origin, ~129.5 km
        assert!(n > 420_000.0 && n < 430_000.0, "northing = {}", n);
    }

    #[test]
    fn test_lower_manhattan() {
        let tm = TransverseMercator::new_jersey_ftus();
        let (e, n) = tm.forward(-74.006, 40.710974);
        assert!((e - 629066.04).abs() < 0.5, "easting = {}", e);
        assert!((n - 684288.26).abs() < 0.5, "northing = {}", n);
    }

    #[test]
    fn test_round_trip_across_new_jersey() {
        let tm = TransverseMercator::new_jersey_ftus();
        let mut lat = 38.9;
        while lat <= 41.4 {
            let mut lon = -75.6;
            while lon <= -73.9 {
                let (e, n) = tm.forward(lon, lat);
                let (lon2, lat2) = tm.inverse(e, n);
                assert!((lon - lon2).abs() < 1e-7, "lon {} -> {}", lon, lon2);
                assert!((lat - lat2).abs() < 1e-7, "lat {} -> {}", lat, lat2);
                lon += 0.1;
            }
            lat += 0.1;
        }
    }

    #[test]
    fn test_inverse_of_false_origin() {
        let tm = TransverseMercator::new_jersey_ftus();
        let (lon, lat) = tm.inverse(492125.0, 0.0);
        assert!((lon - (-74.5)).abs() < 1e-12);
        assert!((lat - 38.833333333333336).abs() < 1e-9);
    }
}
