//! Coordinate reference system transformations.
//!
//! Every projection maps geographic coordinates (degrees) onto a plane and
//! back through the [`Projection`] trait. Plane units depend on the
//! projection: kilometres for the conformal projections, radians of scan
//! angle for geostationary views, degrees for the identity lat/lon case.
//!
//! Implements map projections from scratch without external dependencies.

pub mod error;
pub mod geographic;
pub mod geostationary;
pub mod lambert;
pub mod mercator;
pub mod transform;
pub mod units;

pub use error::{ProjectionError, Result};
pub use geographic::LatLonProjection;
pub use geostationary::Geostationary;
pub use lambert::LambertConformal;
pub use mercator::Mercator;
pub use transform::Projection;
pub use units::plane_scale;

/// Mean earth radius in kilometres used by the spherical projections.
pub const EARTH_RADIUS_KM: f64 = 6371.229;
