//! Geostationary satellite projection.
//!
//! This projection is used for GOES-R series satellite imagery.
//! The satellite views Earth from a fixed position above the equator,
//! and plane coordinates are scan angles in radians from nadir.
//!
//! Only the hemisphere facing the satellite has an image: the forward
//! projection returns `None` for points beyond the limb, and the inverse
//! returns `None` for scan angles that miss the Earth.
//!
//! Reference: GOES-R Product Definition and Users' Guide (PUG) Volume 4

use geo_common::{normalize_lon, LatLonPoint, ProjectionPoint};

use crate::error::{ProjectionError, Result};
use crate::transform::Projection;

#[derive(Debug, Clone, PartialEq)]
pub struct Geostationary {
    /// Satellite distance from Earth center (meters)
    /// This is perspective_point_height + semi_major_axis
    h: f64,
    /// Perspective point height above Earth surface (meters)
    perspective_point_height: f64,
    /// Semi-major axis of Earth ellipsoid (meters)
    req: f64,
    /// Semi-minor axis of Earth ellipsoid (meters)
    rpol: f64,
    /// Longitude of satellite nadir point (degrees)
    sub_lon: f64,
}

impl Geostationary {
    /// Create a projection from the GOES-R `goes_imager_projection` attributes.
    ///
    /// # Arguments
    /// * `perspective_point_height` - Satellite altitude above Earth surface (meters)
    /// * `semi_major_axis` - Earth equatorial radius (meters)
    /// * `semi_minor_axis` - Earth polar radius (meters)
    /// * `sub_lon` - Satellite longitude (degrees, negative for west)
    pub fn new(
        perspective_point_height: f64,
        semi_major_axis: f64,
        semi_minor_axis: f64,
        sub_lon: f64,
    ) -> Result<Self> {
        if !(semi_major_axis > 0.0 && semi_minor_axis > 0.0 && semi_minor_axis <= semi_major_axis)
        {
            return Err(ProjectionError::invalid(
                "geostationary",
                format!(
                    "ellipsoid axes {} / {} are not a valid spheroid",
                    semi_major_axis, semi_minor_axis
                ),
            ));
        }
        if !(perspective_point_height > 0.0) || !sub_lon.is_finite() {
            return Err(ProjectionError::invalid(
                "geostationary",
                "satellite height must be positive and longitude finite",
            ));
        }
        Ok(Self::build(
            perspective_point_height,
            semi_major_axis,
            semi_minor_axis,
            sub_lon,
        ))
    }

    fn build(perspective_point_height: f64, req: f64, rpol: f64, sub_lon: f64) -> Self {
        Self {
            h: perspective_point_height + req,
            perspective_point_height,
            req,
            rpol,
            sub_lon,
        }
    }

    /// GOES-16 (GOES-East at 75°W) on the GRS80 ellipsoid.
    pub fn goes16() -> Self {
        Self::build(35786023.0, 6378137.0, 6356752.31414, -75.0)
    }

    /// GOES-18 (GOES-West at 137.2°W).
    pub fn goes18() -> Self {
        Self::build(35786023.0, 6378137.0, 6356752.31414, -137.2)
    }

    pub fn sub_lon(&self) -> f64 {
        self.sub_lon
    }

    pub fn perspective_point_height(&self) -> f64 {
        self.perspective_point_height
    }
}

impl Projection for Geostationary {
    fn name(&self) -> &str {
        "geostationary"
    }

    fn plane_units(&self) -> &str {
        "radian"
    }

    /// Convert scan angles (radians) to geographic coordinates.
    ///
    /// Based on GOES-R PUG Volume 4, Section 4.2.8.
    fn proj_to_lat_lon(&self, p: ProjectionPoint) -> Option<LatLonPoint> {
        let (sin_x, cos_x) = p.x.sin_cos();
        let (sin_y, cos_y) = p.y.sin_cos();

        // Quadratic coefficients for finding distance to Earth surface
        let a = sin_x.powi(2)
            + cos_x.powi(2) * (cos_y.powi(2) + (self.req / self.rpol).powi(2) * sin_y.powi(2));
        let b = -2.0 * self.h * cos_x * cos_y;
        let c = self.h.powi(2) - self.req.powi(2);

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None; // Scan angle points to space
        }

        let rs = (-b - discriminant.sqrt()) / (2.0 * a);

        // Satellite-centred coordinates of the surface point
        let sx = rs * cos_x * cos_y;
        let sy = -rs * sin_x;
        let sz = rs * cos_x * sin_y;

        let lat = ((self.req / self.rpol).powi(2) * sz / (self.h - sx).hypot(sy)).atan();
        let lon = self.sub_lon.to_radians() - sy.atan2(self.h - sx);

        Some(LatLonPoint::new(
            lat.to_degrees(),
            normalize_lon(lon.to_degrees()),
        ))
    }

    /// Convert geographic coordinates to scan angles (radians).
    ///
    /// Based on GOES-R PUG Volume 4, Section 4.2.8.
    fn lat_lon_to_proj(&self, p: LatLonPoint) -> Option<ProjectionPoint> {
        if !p.lat.is_finite() || !p.lon.is_finite() || p.lat.abs() > 90.0 {
            return None;
        }
        let lat_rad = p.lat.to_radians();
        let dlon = (p.lon - self.sub_lon).to_radians();

        // Geocentric latitude (accounting for Earth's oblateness)
        let phi_c = ((self.rpol / self.req).powi(2) * lat_rad.tan()).atan();

        // Eccentricity squared
        let e2 = 1.0 - (self.rpol / self.req).powi(2);

        // Radius from Earth center to surface point
        let rc = self.rpol / (1.0 - e2 * phi_c.cos().powi(2)).sqrt();

        // Satellite-centred coordinates
        let sx = self.h - rc * phi_c.cos() * dlon.cos();
        let sy = -rc * phi_c.cos() * dlon.sin();
        let sz = rc * phi_c.sin();

        // Beyond the limb as seen from the satellite
        if self.h * (self.h - sx) < sy.powi(2) + (self.req / self.rpol).powi(2) * sz.powi(2) {
            return None;
        }

        let s = (sx * sx + sy * sy + sz * sz).sqrt();
        let x = (-sy / s).asin();
        let y = (sz / sx).atan();
        Some(ProjectionPoint::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{assert_approx_eq, assert_coords_approx_eq};

    #[test]
    fn test_scan_roundtrip() {
        let proj = Geostationary::goes16();

        // At nadir, should be satellite longitude and equator
        let nadir = proj.proj_to_lat_lon(ProjectionPoint::new(0.0, 0.0)).unwrap();
        assert_approx_eq!(nadir.lon, -75.0, 1e-9, "nadir longitude");
        assert_approx_eq!(nadir.lat, 0.0, 1e-9, "nadir latitude");

        let back = proj.lat_lon_to_proj(nadir).unwrap();
        assert_coords_approx_eq!((back.x, back.y), (0.0, 0.0), 1e-9);
    }

    #[test]
    fn test_conus_roundtrip() {
        let proj = Geostationary::goes16();

        for (lat, lon) in [(39.0, -95.0), (25.0, -80.0), (48.0, -122.0), (-30.0, -60.0)] {
            let scan = proj.lat_lon_to_proj(LatLonPoint::new(lat, lon)).unwrap();
            let geo = proj.proj_to_lat_lon(scan).unwrap();
            assert_coords_approx_eq!((geo.lat, geo.lon), (lat, lon), 1e-6);
        }
    }

    #[test]
    fn test_conus_sector_scan_angles() {
        let proj = Geostationary::goes16();

        // Kansas lies inside the CONUS sector:
        // x from -0.10136 to 0.03864, y from 0.04424 to 0.12824 radians
        let scan = proj.lat_lon_to_proj(LatLonPoint::new(39.0, -95.0)).unwrap();
        assert!((-0.10136..0.03864).contains(&scan.x), "x out of sector: {}", scan.x);
        assert!((0.04424..0.12824).contains(&scan.y), "y out of sector: {}", scan.y);
    }

    #[test]
    fn test_off_earth() {
        let proj = Geostationary::goes16();

        // A scan angle of ~28 degrees points to space
        assert!(proj.proj_to_lat_lon(ProjectionPoint::new(0.5, 0.5)).is_none());
    }

    #[test]
    fn test_not_visible() {
        let proj = Geostationary::goes16();

        // For GOES-16 at -75°, a point at +180° longitude is on the opposite side
        let result = proj.lat_lon_to_proj(LatLonPoint::new(0.0, 180.0));
        assert!(result.is_none(), "Point at 180° should not be visible from GOES-16");
    }

    #[test]
    fn test_lat_lon_bounds_of_visible_sector() {
        let proj = Geostationary::goes18();
        let rect = geo_common::ProjectionRect::new(-0.05, -0.05, 0.05, 0.05);
        let bb = proj.proj_to_lat_lon_bb(&rect, 16).unwrap();
        assert!(bb.contains(LatLonPoint::new(0.0, -137.2)));
        assert!(bb.lat_min() < 0.0 && bb.lat_max() > 0.0);
    }

    #[test]
    fn test_rejects_bad_ellipsoid() {
        assert!(Geostationary::new(35786023.0, 6356752.0, 6378137.0, -75.0).is_err());
    }
}
