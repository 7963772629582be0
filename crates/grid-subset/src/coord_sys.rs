//! Grid coordinate systems.
//!
//! A [`GridCoordSystem`] ties together the axes of a grid (optional time,
//! optional vertical with its transform, required y and x) and the
//! projection that relates the horizontal axes to latitude and longitude.
//! Axes, transform and projection are `Arc`-shared so that a derived system
//! can reuse the parent's objects for every axis a subset leaves untouched.

use std::sync::Arc;

use geo_common::{LatLonPoint, LatLonRect, ProjectionRect};
use projection::{plane_scale, LatLonProjection, Projection};
use tracing::debug;

use crate::axis::{AxisType, CoordinateAxis};
use crate::config::SubsetConfig;
use crate::error::{Result, SubsetError};
use crate::range::Range;
use crate::vertical::VerticalTransform;

/// Per-axis ranges relative to a coordinate system. `None` keeps the whole
/// axis at stride 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisRanges {
    pub time: Option<Range>,
    pub vertical: Option<Range>,
    pub y: Option<Range>,
    pub x: Option<Range>,
}

/// The coordinate system of a grid.
#[derive(Debug, Clone)]
pub struct GridCoordSystem {
    time: Option<Arc<CoordinateAxis>>,
    vertical: Option<Arc<CoordinateAxis>>,
    vertical_transform: Option<Arc<VerticalTransform>>,
    y: Arc<CoordinateAxis>,
    x: Arc<CoordinateAxis>,
    projection: Option<Arc<dyn Projection>>,
    /// Factor from horizontal axis units to plane units
    plane_scale: f64,
    map_area: ProjectionRect,
    config: SubsetConfig,
}

/// Builder for [`GridCoordSystem`].
#[derive(Debug)]
pub struct GridCoordSystemBuilder {
    time: Option<Arc<CoordinateAxis>>,
    vertical: Option<Arc<CoordinateAxis>>,
    vertical_transform: Option<Arc<VerticalTransform>>,
    y: Arc<CoordinateAxis>,
    x: Arc<CoordinateAxis>,
    projection: Option<Arc<dyn Projection>>,
    declared_map_area: Option<ProjectionRect>,
    config: SubsetConfig,
}

impl GridCoordSystemBuilder {
    pub fn time(mut self, axis: impl Into<Arc<CoordinateAxis>>) -> Self {
        self.time = Some(axis.into());
        self
    }

    pub fn vertical(mut self, axis: impl Into<Arc<CoordinateAxis>>) -> Self {
        self.vertical = Some(axis.into());
        self
    }

    pub fn vertical_transform(mut self, transform: impl Into<Arc<VerticalTransform>>) -> Self {
        self.vertical_transform = Some(transform.into());
        self
    }

    pub fn projection(mut self, projection: Arc<dyn Projection>) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Map area declared by the dataset, in plane units (e.g. the GOES
    /// `x_image_bounds` / `y_image_bounds` attributes). Checked against the
    /// axes on `build`.
    pub fn map_area(mut self, area: ProjectionRect) -> Self {
        self.declared_map_area = Some(area);
        self
    }

    pub fn config(mut self, config: SubsetConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<GridCoordSystem> {
        self.config.validate().map_err(SubsetError::Config)?;

        check_type(self.time.as_deref(), "time", |t| t == AxisType::Time)?;
        check_type(self.vertical.as_deref(), "vertical", |t| t == AxisType::Vertical)?;
        check_type(Some(self.y.as_ref()), "y", |t| t.is_y())?;
        check_type(Some(self.x.as_ref()), "x", |t| t.is_x())?;

        let lat_lon_axes = match (self.y.axis_type(), self.x.axis_type()) {
            (AxisType::Lat, AxisType::Lon) => true,
            (AxisType::GeoY, AxisType::GeoX) => false,
            (y, x) => {
                return Err(SubsetError::invalid_coord_system(format!(
                    "horizontal axes mix {} and {}",
                    y.as_str(),
                    x.as_str()
                )))
            }
        };

        let scale = match (&self.projection, lat_lon_axes) {
            (None, true) => 1.0,
            (None, false) => {
                return Err(SubsetError::invalid_coord_system(format!(
                    "plane axes '{}' / '{}' need a projection",
                    self.y.name(),
                    self.x.name()
                )))
            }
            (Some(p), true) if !p.is_lat_lon() => {
                return Err(SubsetError::invalid_coord_system(format!(
                    "lat/lon axes cannot use projection '{}'",
                    p.name()
                )))
            }
            (Some(_), true) => 1.0,
            (Some(p), false) => {
                let sx = plane_scale(self.x.units(), p.plane_units())?;
                let sy = plane_scale(self.y.units(), p.plane_units())?;
                if sx != sy {
                    return Err(SubsetError::invalid_coord_system(format!(
                        "x units '{}' and y units '{}' differ",
                        self.x.units(),
                        self.y.units()
                    )));
                }
                sx
            }
        };

        if let Some(vt) = &self.vertical_transform {
            let vertical = self.vertical.as_ref().ok_or_else(|| {
                SubsetError::invalid_coord_system(format!(
                    "vertical transform '{}' without a vertical axis",
                    vt.name()
                ))
            })?;
            vt.validate_levels(vertical.len())?;
        }

        let map_area = self.declared_map_area.unwrap_or_else(|| {
            map_area_for(
                self.projection.as_ref(),
                centre_span(&self.x, scale),
                centre_span(&self.y, scale),
            )
        });
        GridCoordSystem {
            time: self.time,
            vertical: self.vertical,
            vertical_transform: self.vertical_transform,
            y: self.y,
            x: self.x,
            projection: self.projection,
            plane_scale: scale,
            map_area,
            config: self.config,
        }
        .verify_map_area()
    }
}

fn scaled_extent(axis: &CoordinateAxis, scale: f64) -> (f64, f64) {
    let (lo, hi) = axis.extent();
    (lo * scale, hi * scale)
}

/// Outer cell bounds from the first and last coordinate values, padded by
/// half the spacing at each end.
fn centre_span(axis: &CoordinateAxis, scale: f64) -> (f64, f64) {
    let n = axis.len();
    let v = |i: usize| axis.value(i).unwrap_or(f64::NAN);
    let (first, last) = (v(0), v(n - 1));
    let (d0, d1) = match axis.increment() {
        Some(inc) => (inc, inc),
        None if n > 1 => (v(1) - first, last - v(n - 2)),
        None => (0.0, 0.0),
    };
    let a = (first - d0 / 2.0) * scale;
    let b = (last + d1 / 2.0) * scale;
    (a.min(b), a.max(b))
}

fn map_area_for(
    projection: Option<&Arc<dyn Projection>>,
    x: (f64, f64),
    y: (f64, f64),
) -> ProjectionRect {
    match projection {
        Some(p) => p.default_map_area(x, y),
        None => LatLonProjection::default().default_map_area(x, y),
    }
}

fn check_type(
    axis: Option<&CoordinateAxis>,
    role: &str,
    accept: impl Fn(AxisType) -> bool,
) -> Result<()> {
    match axis {
        Some(axis) if !accept(axis.axis_type()) => Err(SubsetError::invalid_coord_system(format!(
            "axis '{}' of type {} cannot be the {} axis",
            axis.name(),
            axis.axis_type().as_str(),
            role
        ))),
        _ => Ok(()),
    }
}

impl GridCoordSystem {
    /// Start building a coordinate system from its horizontal axes.
    pub fn builder(
        y: impl Into<Arc<CoordinateAxis>>,
        x: impl Into<Arc<CoordinateAxis>>,
    ) -> GridCoordSystemBuilder {
        GridCoordSystemBuilder {
            time: None,
            vertical: None,
            vertical_transform: None,
            y: y.into(),
            x: x.into(),
            projection: None,
            declared_map_area: None,
            config: SubsetConfig::default(),
        }
    }

    pub fn time_axis(&self) -> Option<&Arc<CoordinateAxis>> {
        self.time.as_ref()
    }

    pub fn vertical_axis(&self) -> Option<&Arc<CoordinateAxis>> {
        self.vertical.as_ref()
    }

    pub fn vertical_transform(&self) -> Option<&Arc<VerticalTransform>> {
        self.vertical_transform.as_ref()
    }

    pub fn y_axis(&self) -> &Arc<CoordinateAxis> {
        &self.y
    }

    pub fn x_axis(&self) -> &Arc<CoordinateAxis> {
        &self.x
    }

    pub fn projection(&self) -> Option<&Arc<dyn Projection>> {
        self.projection.as_ref()
    }

    pub fn config(&self) -> &SubsetConfig {
        &self.config
    }

    /// True when the horizontal axes are latitude and longitude.
    pub fn is_lat_lon(&self) -> bool {
        self.y.axis_type() == AxisType::Lat && self.x.axis_type() == AxisType::Lon
    }

    /// Factor from horizontal axis units to projection plane units.
    pub fn plane_scale(&self) -> f64 {
        self.plane_scale
    }

    /// Axes in dimension order: time, vertical, y, x (absent ones skipped).
    pub fn axes(&self) -> Vec<&Arc<CoordinateAxis>> {
        self.time
            .iter()
            .chain(self.vertical.iter())
            .chain([&self.y, &self.x])
            .collect()
    }

    pub fn rank(&self) -> usize {
        2 + usize::from(self.time.is_some()) + usize::from(self.vertical.is_some())
    }

    pub fn shape(&self) -> Vec<usize> {
        self.axes().iter().map(|a| a.len()).collect()
    }

    /// Plane rectangle spanned by the outer cell edges of the x/y axes.
    pub fn bounding_box(&self) -> ProjectionRect {
        let (x0, x1) = scaled_extent(&self.x, self.plane_scale);
        let (y0, y1) = scaled_extent(&self.y, self.plane_scale);
        ProjectionRect::new(x0, y0, x1, y1)
    }

    /// Map area declared by the dataset, or reported by the projection for
    /// the span of this system's coordinate values.
    pub fn map_area(&self) -> ProjectionRect {
        self.map_area
    }

    /// Geographic rectangle enclosing the grid.
    ///
    /// `None` when no point of a projected grid has an inverse.
    pub fn lat_lon_bounding_box(&self) -> Option<LatLonRect> {
        if self.is_lat_lon() {
            let (lat0, lat1) = self.y.extent();
            let (lon0, lon1) = self.x.extent();
            let lat0 = lat0.clamp(-90.0, 90.0);
            let lat1 = lat1.clamp(-90.0, 90.0);
            return LatLonRect::new(
                LatLonPoint::new(lat0, lon0),
                lat1 - lat0,
                (lon1 - lon0).min(360.0),
            )
            .ok();
        }
        self.projection
            .as_ref()?
            .proj_to_lat_lon_bb(&self.bounding_box(), self.config.lat_lon_bounds_samples)
    }

    fn verify_map_area(self) -> Result<Self> {
        let bbox = self.bounding_box();
        if !bbox.approx_eq(&self.map_area, self.config.map_area_tolerance) {
            return Err(SubsetError::invalid_coord_system(format!(
                "bounding box {} disagrees with map area {}",
                bbox, self.map_area
            )));
        }
        Ok(self)
    }

    /// Derived coordinate system restricted to `ranges`.
    ///
    /// Axes whose range is absent or selects the whole axis at stride 1 are
    /// shared with `self`; the others are rebuilt. A range on an axis this
    /// system lacks, or one that does not fit its axis, is an
    /// `IncompatibleAxisRequest`.
    pub fn section(&self, ranges: &AxisRanges) -> Result<GridCoordSystem> {
        let time = section_axis(self.time.as_ref(), ranges.time, "time")?;
        let vertical = section_axis(self.vertical.as_ref(), ranges.vertical, "vertical")?;
        let y = section_axis(Some(&self.y), ranges.y, "y")?;
        let x = section_axis(Some(&self.x), ranges.x, "x")?;

        let vertical_transform = match (&self.vertical_transform, &vertical, &self.vertical) {
            (Some(vt), Some(new), Some(old)) if !Arc::ptr_eq(new, old) => match ranges.vertical {
                Some(r) => Some(Arc::new(vt.section(&r)?)),
                None => Some(Arc::clone(vt)),
            },
            (vt, _, _) => vt.clone(),
        };
        let y = y.unwrap_or_else(|| Arc::clone(&self.y));
        let x = x.unwrap_or_else(|| Arc::clone(&self.x));
        let map_area = map_area_for(
            self.projection.as_ref(),
            centre_span(&x, self.plane_scale),
            centre_span(&y, self.plane_scale),
        );

        let derived = GridCoordSystem {
            time,
            vertical,
            vertical_transform,
            y,
            x,
            projection: self.projection.clone(),
            plane_scale: self.plane_scale,
            map_area,
            config: self.config.clone(),
        }
        .verify_map_area()?;

        debug!(
            shape = ?derived.shape(),
            bbox = %derived.bounding_box(),
            "Built derived coordinate system"
        );
        Ok(derived)
    }
}

fn section_axis(
    axis: Option<&Arc<CoordinateAxis>>,
    range: Option<Range>,
    role: &str,
) -> Result<Option<Arc<CoordinateAxis>>> {
    match (axis, range) {
        (None, None) => Ok(None),
        (None, Some(r)) => Err(SubsetError::incompatible(
            role,
            format!("range {} given but the grid has no {} axis", r, role),
        )),
        (Some(axis), None) => Ok(Some(Arc::clone(axis))),
        (Some(axis), Some(r)) if r.is_full(axis.len()) => Ok(Some(Arc::clone(axis))),
        (Some(axis), Some(r)) => {
            if r.last() >= axis.len() {
                return Err(SubsetError::incompatible(
                    axis.name(),
                    format!("range {} does not fit {} values", r, axis.len()),
                ));
            }
            Ok(Some(Arc::new(axis.section(&r)?)))
        }
    }
}
