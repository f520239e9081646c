//! Common types and utilities shared across the WMS proxy crates.

pub mod bbox;
pub mod crs;
pub mod error;

pub use bbox::BoundingBox;
pub use crs::{normalize_crs, CrsCode, DEFAULT_BACKEND_CRS, DEFAULT_SOURCE_CRS};
pub use error::{WmsError, WmsResult};
