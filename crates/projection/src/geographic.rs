//! Identity projection for grids whose horizontal axes are latitude and
//! longitude.
//!
//! The plane is `x = longitude`, `y = latitude` in degrees, with longitudes
//! folded into the window `[center_lon - 180, center_lon + 180)`.

use geo_common::{lon_from_base, LatLonPoint, LatLonRect, ProjectionPoint, ProjectionRect};

use crate::transform::Projection;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLonProjection {
    center_lon: f64,
}

impl LatLonProjection {
    pub fn new(center_lon: f64) -> Self {
        Self { center_lon }
    }

    pub fn center_lon(&self) -> f64 {
        self.center_lon
    }

    fn window_start(&self) -> f64 {
        self.center_lon - 180.0
    }
}

impl Default for LatLonProjection {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Projection for LatLonProjection {
    fn name(&self) -> &str {
        "latitude_longitude"
    }

    fn plane_units(&self) -> &str {
        "degrees"
    }

    fn is_lat_lon(&self) -> bool {
        true
    }

    fn is_rectilinear(&self) -> bool {
        true
    }

    fn seam_longitude(&self) -> Option<f64> {
        Some(self.center_lon + 180.0)
    }

    fn lat_lon_to_proj(&self, p: LatLonPoint) -> Option<ProjectionPoint> {
        if !p.lat.is_finite() || !p.lon.is_finite() || p.lat.abs() > 90.0 {
            return None;
        }
        Some(ProjectionPoint::new(
            lon_from_base(p.lon, self.window_start()),
            p.lat,
        ))
    }

    fn proj_to_lat_lon(&self, p: ProjectionPoint) -> Option<LatLonPoint> {
        if !p.x.is_finite() || !p.y.is_finite() {
            return None;
        }
        Some(LatLonPoint::new(p.y.clamp(-90.0, 90.0), p.x))
    }

    fn lat_lon_to_proj_rects(&self, rect: &LatLonRect, _samples: usize) -> Vec<ProjectionRect> {
        rect.lon_spans_from(self.window_start())
            .into_iter()
            .map(|(lo, hi)| ProjectionRect::new(lo, rect.lat_min(), hi, rect.lat_max()))
            .collect()
    }

    fn proj_to_lat_lon_bb(&self, rect: &ProjectionRect, _samples: usize) -> Option<LatLonRect> {
        let lat_min = rect.min_y.clamp(-90.0, 90.0);
        let lat_max = rect.max_y.clamp(-90.0, 90.0);
        LatLonRect::new(
            LatLonPoint::new(lat_min, rect.min_x),
            lat_max - lat_min,
            rect.width().min(360.0),
        )
        .ok()
    }
}
