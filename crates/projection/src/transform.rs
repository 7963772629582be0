//! The projection trait and the rectangle helpers built on top of it.

use std::fmt;

use geo_common::{lon_from_base, LatLonPoint, LatLonRect, ProjectionPoint, ProjectionRect};

/// Distance (degrees) a sample is pulled away from the seam so that it
/// projects onto the correct side of the plane.
const SEAM_NUDGE: f64 = 1e-7;

/// A bidirectional mapping between geographic and plane coordinates.
///
/// Projections are stateless with respect to subsetting and are shared by
/// reference between a coordinate system and every section derived from it.
pub trait Projection: Send + Sync + fmt::Debug {
    /// Short name, e.g. `"lambert_conformal_conic"`.
    fn name(&self) -> &str;

    /// Unit string of plane coordinates.
    fn plane_units(&self) -> &str;

    /// True for the identity projection, where plane coordinates are degrees.
    fn is_lat_lon(&self) -> bool {
        false
    }

    /// True when a lat/lon rectangle maps onto a plane rectangle, so the
    /// corners alone bound its image.
    fn is_rectilinear(&self) -> bool {
        false
    }

    /// Longitude where the plane is cut, if any. Rectangles running across
    /// it are split into two plane rectangles.
    fn seam_longitude(&self) -> Option<f64> {
        None
    }

    /// Forward projection. `None` when the point has no image on the plane.
    fn lat_lon_to_proj(&self, p: LatLonPoint) -> Option<ProjectionPoint>;

    /// Inverse projection. `None` when the plane point has no geographic
    /// counterpart.
    fn proj_to_lat_lon(&self, p: ProjectionPoint) -> Option<LatLonPoint>;

    /// Plane rectangles enclosing the image of `rect`.
    ///
    /// Returns two rectangles when `rect` straddles the seam and none when no
    /// sample point of `rect` is projectable. `samples` extra points per edge
    /// are used for non-rectilinear projections.
    fn lat_lon_to_proj_rects(&self, rect: &LatLonRect, samples: usize) -> Vec<ProjectionRect> {
        lon_pieces(rect, self.seam_longitude())
            .into_iter()
            .filter_map(|(lon_lo, lon_hi)| {
                let n = if self.is_rectilinear() { 1 } else { samples.max(1) };
                let points = edge_samples(rect.lat_min(), rect.lat_max(), lon_lo, lon_hi, n)
                    .filter_map(|p| self.lat_lon_to_proj(p));
                ProjectionRect::enclosing(points)
            })
            .collect()
    }

    /// Geographic rectangle enclosing the inverse image of a plane rectangle.
    ///
    /// Edge points with no inverse are skipped. `None` when no sampled point
    /// has one.
    fn proj_to_lat_lon_bb(&self, rect: &ProjectionRect, samples: usize) -> Option<LatLonRect> {
        let n = samples.max(1);
        let mut points = Vec::with_capacity(4 * n + 1);
        for i in 0..=n {
            let f = i as f64 / n as f64;
            let x = rect.min_x + f * rect.width();
            let y = rect.min_y + f * rect.height();
            points.push(ProjectionPoint::new(x, rect.min_y));
            points.push(ProjectionPoint::new(x, rect.max_y));
            points.push(ProjectionPoint::new(rect.min_x, y));
            points.push(ProjectionPoint::new(rect.max_x, y));
        }
        // interior points catch a pole sitting inside the rectangle
        points.push(rect.center());

        let geo: Vec<LatLonPoint> = points
            .into_iter()
            .filter_map(|p| self.proj_to_lat_lon(p))
            .filter(|p| p.lat.is_finite() && p.lon.is_finite())
            .collect();
        enclosing_lat_lon(&geo, self.proj_to_lat_lon(rect.center()))
    }

    /// Map area of a grid whose cells span `x` and `y` on the plane.
    ///
    /// Callers pass spans derived from coordinate values, and compare the
    /// result with the cell-edge bounding box of the grid's axes.
    fn default_map_area(&self, x: (f64, f64), y: (f64, f64)) -> ProjectionRect {
        ProjectionRect::new(x.0, y.0, x.1, y.1)
    }
}

/// Longitude intervals of `rect` that do not cross `seam`.
fn lon_pieces(rect: &LatLonRect, seam: Option<f64>) -> Vec<(f64, f64)> {
    let Some(seam) = seam else {
        return vec![(rect.lon_min(), rect.lon_max())];
    };
    let base = lon_from_base(seam, -180.0);
    rect.lon_spans_from(base)
        .into_iter()
        .map(|(lo, hi)| {
            let lo = if (lo - base).abs() < SEAM_NUDGE { lo + SEAM_NUDGE } else { lo };
            let hi = if (hi - base - 360.0).abs() < SEAM_NUDGE { hi - SEAM_NUDGE } else { hi };
            (lo, hi)
        })
        .filter(|(lo, hi)| hi >= lo)
        .collect()
}

/// Corners plus `n - 1` interior points along each edge.
fn edge_samples(
    lat_lo: f64,
    lat_hi: f64,
    lon_lo: f64,
    lon_hi: f64,
    n: usize,
) -> impl Iterator<Item = LatLonPoint> {
    (0..=n).flat_map(move |i| {
        let f = i as f64 / n as f64;
        let lat = lat_lo + f * (lat_hi - lat_lo);
        let lon = lon_lo + f * (lon_hi - lon_lo);
        [
            LatLonPoint::new(lat_lo, lon),
            LatLonPoint::new(lat_hi, lon),
            LatLonPoint::new(lat, lon_lo),
            LatLonPoint::new(lat, lon_hi),
        ]
    })
}

/// Smallest lat/lon rectangle holding `points`, with longitudes unwrapped
/// around `reference` (or the first point).
pub(crate) fn enclosing_lat_lon(
    points: &[LatLonPoint],
    reference: Option<LatLonPoint>,
) -> Option<LatLonRect> {
    let first = points.first()?;
    let center = reference.unwrap_or(*first).lon;
    let base = center - 180.0;

    let mut lat_min = f64::INFINITY;
    let mut lat_max = f64::NEG_INFINITY;
    let mut lon_min = f64::INFINITY;
    let mut lon_max = f64::NEG_INFINITY;
    for p in points {
        let lon = lon_from_base(p.lon, base);
        lat_min = lat_min.min(p.lat);
        lat_max = lat_max.max(p.lat);
        lon_min = lon_min.min(lon);
        lon_max = lon_max.max(lon);
    }
    let lat_min = lat_min.clamp(-90.0, 90.0);
    let lat_max = lat_max.clamp(-90.0, 90.0);
    LatLonRect::new(
        LatLonPoint::new(lat_min, lon_min),
        lat_max - lat_min,
        (lon_max - lon_min).min(360.0),
    )
    .ok()
}
