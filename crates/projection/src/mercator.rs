//! Spherical Web Mercator (EPSG:3857).
//!
//! Web Mercator treats the Earth as a sphere with the WGS84 semi-major axis
//! as its radius. Geographic coordinates are WGS84 longitude/latitude in
//! degrees; projected coordinates are meters.

use std::f64::consts::PI;

/// Sphere radius used by Web Mercator (meters).
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Convert Web Mercator (x, y) in meters to geographic (lon, lat) in degrees.
pub fn web_mercator_to_geographic(x: f64, y: f64) -> (f64, f64) {
    let lon = x / EARTH_RADIUS * 180.0 / PI;
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0) * 180.0 / PI;
    (lon, lat)
}

/// Convert geographic (lon, lat) in degrees to Web Mercator (x, y) in meters.
///
/// Latitudes of ±90° have no finite image; they produce infinite northings.
pub fn geographic_to_web_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = lon * PI / 180.0 * EARTH_RADIUS;
    let y = EARTH_RADIUS * ((90.0 + lat) * PI / 360.0).tan().ln();
    (x, y)
}
