//! Coordinate reference system transformations.
//!
//! Implements the projections from scratch without external dependencies:
//! spherical Web Mercator and ellipsoidal Transverse Mercator (New Jersey
//! State Plane), wired together in a pairwise transform table.

pub mod mercator;
pub mod transform;
pub mod transverse_mercator;

pub use transform::{CoordinateTransformer, TransformFn};
pub use transverse_mercator::TransverseMercator;
