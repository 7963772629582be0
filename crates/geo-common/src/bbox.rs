//! Bounding box types and operations.
//!
//! Two flavours of rectangle live here:
//! - [`ProjectionRect`]: axis-aligned rectangle in projected-plane coordinates
//!   (kilometres, radians or degrees depending on the projection).
//! - [`LatLonRect`]: geographic rectangle that may wrap across the ±180°
//!   longitude seam.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BboxParseError, GeoError};

/// Normalize a longitude into `[-180, 180)`.
pub fn normalize_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Shift `lon` by a multiple of 360 so that it lands in `[base, base + 360)`.
pub fn lon_from_base(lon: f64, base: f64) -> f64 {
    base + (lon - base).rem_euclid(360.0)
}

/// A point in geographic coordinates (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLonPoint {
    pub lat: f64,
    pub lon: f64,
}

impl LatLonPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for LatLonPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}N {:.4}E", self.lat, self.lon)
    }
}

/// A point in projected-plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectionPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in projected-plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ProjectionRect {
    /// Create a rectangle from two opposite corners, in any order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    /// Smallest rectangle enclosing all finite points, or `None` if there are none.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = ProjectionPoint>,
    {
        let mut rect: Option<Self> = None;
        for p in points {
            if !p.x.is_finite() || !p.y.is_finite() {
                continue;
            }
            rect = Some(match rect {
                None => Self::new(p.x, p.y, p.x, p.y),
                Some(r) => Self {
                    min_x: r.min_x.min(p.x),
                    min_y: r.min_y.min(p.y),
                    max_x: r.max_x.max(p.x),
                    max_y: r.max_y.max(p.y),
                },
            });
        }
        rect
    }

    /// Parse a "minx,miny,maxx,maxy" string.
    pub fn from_bbox_string(s: &str) -> Result<Self, BboxParseError> {
        let [a, b, c, d] = parse_four(s)?;
        Ok(Self::new(a, b, c, d))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> ProjectionPoint {
        ProjectionPoint::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Check if this rect intersects another (touching edges count).
    pub fn intersects(&self, other: &ProjectionRect) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// Compute the intersection of two rectangles.
    pub fn intersection(&self, other: &ProjectionRect) -> Option<ProjectionRect> {
        if !self.intersects(other) {
            return None;
        }

        Some(ProjectionRect {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &ProjectionRect) -> ProjectionRect {
        ProjectionRect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn contains_point(&self, p: ProjectionPoint) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Compare corner by corner, relative to the larger of the two extents.
    pub fn approx_eq(&self, other: &ProjectionRect, rel_tol: f64) -> bool {
        let scale = self
            .width()
            .abs()
            .max(self.height().abs())
            .max(other.width().abs())
            .max(other.height().abs())
            .max(f64::MIN_POSITIVE);
        let tol = rel_tol * scale;
        (self.min_x - other.min_x).abs() <= tol
            && (self.min_y - other.min_y).abs() <= tol
            && (self.max_x - other.max_x).abs() <= tol
            && (self.max_y - other.max_y).abs() <= tol
    }
}

impl fmt::Display for ProjectionRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[x {:.4}..{:.4}, y {:.4}..{:.4}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}

/// A geographic rectangle.
///
/// Latitudes are plain bounds. Longitude is stored as a western edge
/// normalized to `[-180, 180)` plus an eastward width in `[0, 360]`, so a
/// rectangle may run across the ±180° seam.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLatLonRect")]
pub struct LatLonRect {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    width: f64,
}

#[derive(Deserialize)]
struct RawLatLonRect {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    width: f64,
}

impl TryFrom<RawLatLonRect> for LatLonRect {
    type Error = GeoError;

    fn try_from(raw: RawLatLonRect) -> Result<Self, GeoError> {
        LatLonRect::new(
            LatLonPoint::new(raw.lat_min, raw.lon_min),
            raw.lat_max - raw.lat_min,
            raw.width,
        )
    }
}

impl LatLonRect {
    /// Rectangle with `lower_left` as its south-west corner, extending
    /// `delta_lat` degrees north and `delta_lon` degrees east.
    pub fn new(lower_left: LatLonPoint, delta_lat: f64, delta_lon: f64) -> Result<Self, GeoError> {
        if !(lower_left.lat.is_finite() && lower_left.lon.is_finite()) {
            return Err(GeoError::InvalidBbox(format!(
                "corner ({}, {}) is not finite",
                lower_left.lat, lower_left.lon
            )));
        }
        if !(delta_lat.is_finite() && delta_lon.is_finite()) || delta_lat < 0.0 || delta_lon < 0.0 {
            return Err(GeoError::InvalidBbox(format!(
                "extent must be non-negative, got dlat={delta_lat} dlon={delta_lon}"
            )));
        }
        if delta_lon > 360.0 {
            return Err(GeoError::InvalidBbox(format!(
                "longitude width {delta_lon} exceeds 360 degrees"
            )));
        }
        let lat_min = lower_left.lat;
        let lat_max = lower_left.lat + delta_lat;
        if lat_min < -90.0 || lat_max > 90.0 {
            return Err(GeoError::InvalidBbox(format!(
                "latitude span {lat_min}..{lat_max} outside -90..90"
            )));
        }
        Ok(Self {
            lat_min,
            lat_max,
            lon_min: normalize_lon(lower_left.lon),
            width: delta_lon,
        })
    }

    /// Rectangle between two corners. `west` gives the western edge; the
    /// rectangle runs east until it reaches `east.lon`.
    pub fn from_corners(west: LatLonPoint, east: LatLonPoint) -> Result<Self, GeoError> {
        let lat_min = west.lat.min(east.lat);
        let lat_max = west.lat.max(east.lat);
        let mut width = (east.lon - west.lon).rem_euclid(360.0);
        if width == 0.0 && (east.lon - west.lon).abs() >= 360.0 {
            width = 360.0;
        }
        Self::new(LatLonPoint::new(lat_min, west.lon), lat_max - lat_min, width)
    }

    /// Parse a "minlon,minlat,maxlon,maxlat" string.
    pub fn from_bbox_string(s: &str) -> Result<Self, GeoError> {
        let [min_lon, min_lat, max_lon, max_lat] = parse_four(s)?;
        Self::from_corners(
            LatLonPoint::new(min_lat, min_lon),
            LatLonPoint::new(max_lat, max_lon),
        )
    }

    /// The whole globe.
    pub fn global() -> Self {
        Self {
            lat_min: -90.0,
            lat_max: 90.0,
            lon_min: -180.0,
            width: 360.0,
        }
    }

    pub fn lat_min(&self) -> f64 {
        self.lat_min
    }

    pub fn lat_max(&self) -> f64 {
        self.lat_max
    }

    /// Western edge in `[-180, 180)`.
    pub fn lon_min(&self) -> f64 {
        self.lon_min
    }

    /// Eastern edge, `lon_min + width`; exceeds 180 when the rect crosses the seam.
    pub fn lon_max(&self) -> f64 {
        self.lon_min + self.width
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    pub fn lower_left(&self) -> LatLonPoint {
        LatLonPoint::new(self.lat_min, self.lon_min)
    }

    pub fn upper_right(&self) -> LatLonPoint {
        LatLonPoint::new(self.lat_max, normalize_lon(self.lon_max()))
    }

    pub fn center(&self) -> LatLonPoint {
        LatLonPoint::new(
            (self.lat_min + self.lat_max) / 2.0,
            normalize_lon(self.lon_min + self.width / 2.0),
        )
    }

    pub fn is_global_in_lon(&self) -> bool {
        self.width >= 360.0
    }

    /// True when the rectangle runs across the ±180° meridian.
    pub fn crosses_seam(&self) -> bool {
        self.lon_max() > 180.0
    }

    pub fn contains(&self, p: LatLonPoint) -> bool {
        if p.lat < self.lat_min || p.lat > self.lat_max {
            return false;
        }
        self.is_global_in_lon() || (p.lon - self.lon_min).rem_euclid(360.0) <= self.width
    }

    /// Longitude intervals of this rectangle expressed in the window
    /// `[base, base + 360]`.
    ///
    /// One interval when the rectangle fits inside the window, two when it
    /// runs across `base + 360` (the seam of that window).
    pub fn lon_spans_from(&self, base: f64) -> Vec<(f64, f64)> {
        if self.is_global_in_lon() {
            return vec![(base, base + 360.0)];
        }
        let lo = lon_from_base(self.lon_min, base);
        let hi = lo + self.width;
        let end = base + 360.0;
        if hi <= end {
            vec![(lo, hi)]
        } else {
            vec![(lo, end), (base, hi - 360.0)]
        }
    }
}

impl fmt::Display for LatLonRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[lat {:.4}..{:.4}, lon {:.4}..{:.4}]",
            self.lat_min,
            self.lat_max,
            self.lon_min,
            self.lon_max()
        )
    }
}

fn parse_four(s: &str) -> Result<[f64; 4], BboxParseError> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(BboxParseError::InvalidFormat(s.to_string()));
    }

    let mut out = [0.0; 4];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))?;
    }
    Ok(out)
}
