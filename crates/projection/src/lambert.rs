//! Lambert Conformal Conic projection.
//!
//! This projection is commonly used for weather model output, including
//! HRRR, NAM and WRF runs. It maps a cone tangent or secant to the Earth's
//! surface onto a flat plane.
//!
//! The projection parameters are:
//! - Origin latitude (lat0): latitude mapped to plane y = false northing
//! - Central meridian (lon0): LoV in GRIB2 terms
//! - Standard parallel(s): par1 and par2 (equal for a tangent cone)
//!
//! Plane coordinates are kilometres on a sphere of radius
//! [`EARTH_RADIUS_KM`](crate::EARTH_RADIUS_KM).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use geo_common::{normalize_lon, LatLonPoint, ProjectionPoint};

use crate::error::{ProjectionError, Result};
use crate::transform::Projection;
use crate::EARTH_RADIUS_KM;

#[derive(Debug, Clone, PartialEq)]
pub struct LambertConformal {
    /// Origin latitude (degrees)
    lat0: f64,
    /// Central meridian (degrees)
    lon0: f64,
    /// First standard parallel (degrees)
    par1: f64,
    /// Second standard parallel (degrees)
    par2: f64,
    false_easting: f64,
    false_northing: f64,
    earth_radius: f64,
    /// Cone constant
    n: f64,
    /// R * F
    rf: f64,
    /// Rho at the origin latitude
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection from degrees, with plane origin at (lat0, lon0).
    pub fn new(lat0: f64, lon0: f64, par1: f64, par2: f64) -> Result<Self> {
        Self::with_offsets(lat0, lon0, par1, par2, 0.0, 0.0)
    }

    /// Same as [`new`](Self::new) with false easting/northing in kilometres.
    pub fn with_offsets(
        lat0: f64,
        lon0: f64,
        par1: f64,
        par2: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self> {
        for (name, value) in [("lat0", lat0), ("par1", par1), ("par2", par2)] {
            if !value.is_finite() || value.abs() >= 90.0 {
                return Err(ProjectionError::invalid(
                    "lambert_conformal_conic",
                    format!("{} = {} must lie strictly between the poles", name, value),
                ));
            }
        }
        if (par1 + par2).abs() < 1e-10 {
            return Err(ProjectionError::invalid(
                "lambert_conformal_conic",
                "standard parallels are symmetric about the equator",
            ));
        }
        Ok(Self::build(
            lat0,
            lon0,
            par1,
            par2,
            false_easting,
            false_northing,
        ))
    }

    fn build(
        lat0: f64,
        lon0: f64,
        par1: f64,
        par2: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let phi1 = par1.to_radians();
        let phi2 = par2.to_radians();
        let earth_radius = EARTH_RADIUS_KM;

        // Compute cone constant n
        let n = if (phi1 - phi2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            phi1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (phi1.cos() / phi2.cos()).ln();
            let tan_ratio = ((FRAC_PI_4 + phi2 / 2.0).tan() / (FRAC_PI_4 + phi1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        let f = phi1.cos() * (FRAC_PI_4 + phi1 / 2.0).tan().powf(n) / n;
        let rf = earth_radius * f;
        let rho0 = rf / (FRAC_PI_4 + lat0.to_radians() / 2.0).tan().powf(n);

        Self {
            lat0,
            lon0,
            par1,
            par2,
            false_easting,
            false_northing,
            earth_radius,
            n,
            rf,
            rho0,
        }
    }

    /// HRRR projection: tangent cone at 38.5°N, central meridian 97.5°W,
    /// plane origin at (38.5°N, 97.5°W).
    pub fn hrrr() -> Self {
        Self::build(38.5, -97.5, 38.5, 38.5, 0.0, 0.0)
    }

    pub fn lat0(&self) -> f64 {
        self.lat0
    }

    pub fn lon0(&self) -> f64 {
        self.lon0
    }

    pub fn parallels(&self) -> (f64, f64) {
        (self.par1, self.par2)
    }

    pub fn cone_constant(&self) -> f64 {
        self.n
    }

    fn rho(&self, lat_rad: f64) -> f64 {
        self.rf / (FRAC_PI_4 + lat_rad / 2.0).tan().powf(self.n)
    }
}

impl Projection for LambertConformal {
    fn name(&self) -> &str {
        "lambert_conformal_conic"
    }

    fn plane_units(&self) -> &str {
        "km"
    }

    fn seam_longitude(&self) -> Option<f64> {
        Some(self.lon0 + 180.0)
    }

    fn lat_lon_to_proj(&self, p: LatLonPoint) -> Option<ProjectionPoint> {
        if !p.lat.is_finite() || !p.lon.is_finite() || p.lat.abs() > 90.0 {
            return None;
        }
        let rho = self.rho(p.lat.to_radians());
        if !rho.is_finite() {
            // the pole opposite the cone apex
            return None;
        }
        let theta = self.n * normalize_lon(p.lon - self.lon0).to_radians();

        let x = rho * theta.sin() + self.false_easting;
        let y = self.rho0 - rho * theta.cos() + self.false_northing;
        Some(ProjectionPoint::new(x, y))
    }

    fn proj_to_lat_lon(&self, p: ProjectionPoint) -> Option<LatLonPoint> {
        let x = p.x - self.false_easting;
        let y = self.rho0 - (p.y - self.false_northing);
        let sign = self.n.signum();

        let rho = sign * x.hypot(y);
        let theta = (sign * x).atan2(sign * y);

        let lat = if rho == 0.0 {
            sign * FRAC_PI_2
        } else {
            2.0 * (self.rf / rho).powf(1.0 / self.n).atan() - FRAC_PI_2
        };
        if theta.abs() > self.n.abs() * PI + 1e-12 {
            // outside the unrolled cone
            return None;
        }
        let lon = normalize_lon(self.lon0 + (theta / self.n).to_degrees());
        let lat = lat.to_degrees();
        (lat.is_finite() && lon.is_finite()).then(|| LatLonPoint::new(lat, lon))
    }
}
