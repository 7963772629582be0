//! Spherical Mercator projection.
//!
//! Parallels and meridians are straight lines, so a lat/lon rectangle maps
//! onto a plane rectangle. Plane coordinates are kilometres.

use std::f64::consts::FRAC_PI_4;

use geo_common::{normalize_lon, LatLonPoint, ProjectionPoint};

use crate::error::{ProjectionError, Result};
use crate::transform::Projection;
use crate::EARTH_RADIUS_KM;

/// Latitudes closer to a pole than this have no finite image.
const MAX_LAT: f64 = 89.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Mercator {
    /// Central meridian (degrees)
    lon0: f64,
    /// Latitude of true scale (degrees)
    lat_ts: f64,
    false_easting: f64,
    false_northing: f64,
    earth_radius: f64,
    /// Radius scaled by cos(lat_ts)
    scale: f64,
}

impl Mercator {
    pub fn new(lon0: f64, lat_ts: f64) -> Result<Self> {
        Self::with_offsets(lon0, lat_ts, 0.0, 0.0)
    }

    pub fn with_offsets(
        lon0: f64,
        lat_ts: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self> {
        if !lat_ts.is_finite() || lat_ts.abs() >= MAX_LAT {
            return Err(ProjectionError::invalid(
                "mercator",
                format!("latitude of true scale {} out of range", lat_ts),
            ));
        }
        if !lon0.is_finite() {
            return Err(ProjectionError::invalid("mercator", "central meridian is not finite"));
        }
        Ok(Self {
            lon0,
            lat_ts,
            false_easting,
            false_northing,
            earth_radius: EARTH_RADIUS_KM,
            scale: EARTH_RADIUS_KM * lat_ts.to_radians().cos(),
        })
    }

    pub fn lon0(&self) -> f64 {
        self.lon0
    }

    pub fn lat_ts(&self) -> f64 {
        self.lat_ts
    }

    pub fn earth_radius(&self) -> f64 {
        self.earth_radius
    }
}

impl Projection for Mercator {
    fn name(&self) -> &str {
        "mercator"
    }

    fn plane_units(&self) -> &str {
        "km"
    }

    fn is_rectilinear(&self) -> bool {
        true
    }

    fn seam_longitude(&self) -> Option<f64> {
        Some(self.lon0 + 180.0)
    }

    fn lat_lon_to_proj(&self, p: LatLonPoint) -> Option<ProjectionPoint> {
        if !p.lat.is_finite() || !p.lon.is_finite() || p.lat.abs() > MAX_LAT {
            return None;
        }
        let dlon = normalize_lon(p.lon - self.lon0).to_radians();
        let lat = p.lat.to_radians();
        let x = self.scale * dlon + self.false_easting;
        let y = self.scale * (FRAC_PI_4 + lat / 2.0).tan().ln() + self.false_northing;
        Some(ProjectionPoint::new(x, y))
    }

    fn proj_to_lat_lon(&self, p: ProjectionPoint) -> Option<LatLonPoint> {
        let x = (p.x - self.false_easting) / self.scale;
        let y = (p.y - self.false_northing) / self.scale;
        let lat = (2.0 * y.exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
        let lon = normalize_lon(self.lon0 + x.to_degrees());
        (lat.is_finite() && lon.is_finite()).then(|| LatLonPoint::new(lat, lon))
    }
}
