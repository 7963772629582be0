//! Subset requests.
//!
//! A [`SubsetRequest`] collects the caller's constraints. Resolving it
//! against a coordinate system runs the axis range resolver for time and
//! vertical and the geographic projector for y/x; the two groups are
//! independent and meet only in the resulting [`AxisRanges`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use geo_common::LatLonRect;
//! use grid_subset::{Range, SubsetRequest};
//!
//! let request = SubsetRequest::new()
//!     .time_range(Range::new(2, 5)?)
//!     .lat_lon_bbox(LatLonRect::from_bbox_string("-105,35,-95,42")?)
//!     .stride_xy(2);
//! let view = grid.subset(&request)?;
//! ```

use std::sync::Arc;

use geo_common::{LatLonRect, TimeWindow};
use serde::{Deserialize, Serialize};

use crate::coord_sys::{AxisRanges, GridCoordSystem};
use crate::error::Result;
use crate::geo_index::lat_lon_to_index;
use crate::grid::{GeoGrid, GridSectionView};
use crate::range::Range;
use crate::resolver::{resolve_range, resolve_time_window};

/// A constraint on the time axis: indices or dates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeConstraint {
    /// Index range on the time axis
    Range(Range),
    /// Inclusive window of dates, for CF time axes
    Window(TimeWindow),
}

/// Constraints and strides for one subset operation.
///
/// Absent constraints keep the whole axis. Strides apply to the whole axis
/// when its constraint is absent, and to the selected span for a bounding
/// box; an explicit index range keeps its own stride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsetRequest {
    pub time: Option<TimeConstraint>,
    pub vertical: Option<Range>,
    pub bbox: Option<LatLonRect>,
    pub stride_time: usize,
    pub stride_vertical: usize,
    pub stride_y: usize,
    pub stride_x: usize,
}

impl Default for SubsetRequest {
    fn default() -> Self {
        Self {
            time: None,
            vertical: None,
            bbox: None,
            stride_time: 1,
            stride_vertical: 1,
            stride_y: 1,
            stride_x: 1,
        }
    }
}

impl SubsetRequest {
    /// A request that keeps everything.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_range(mut self, range: Range) -> Self {
        self.time = Some(TimeConstraint::Range(range));
        self
    }

    pub fn time_window(mut self, window: TimeWindow) -> Self {
        self.time = Some(TimeConstraint::Window(window));
        self
    }

    pub fn vertical_range(mut self, range: Range) -> Self {
        self.vertical = Some(range);
        self
    }

    pub fn lat_lon_bbox(mut self, bbox: LatLonRect) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn stride_time(mut self, stride: usize) -> Self {
        self.stride_time = stride;
        self
    }

    pub fn stride_vertical(mut self, stride: usize) -> Self {
        self.stride_vertical = stride;
        self
    }

    pub fn stride_y(mut self, stride: usize) -> Self {
        self.stride_y = stride;
        self
    }

    pub fn stride_x(mut self, stride: usize) -> Self {
        self.stride_x = stride;
        self
    }

    /// Same stride on both horizontal axes.
    pub fn stride_xy(self, stride: usize) -> Self {
        self.stride_y(stride).stride_x(stride)
    }

    /// Ranges this request selects on `cs`, relative to its axes.
    pub fn resolve(&self, cs: &GridCoordSystem) -> Result<AxisRanges> {
        let time_axis = cs.time_axis().map(Arc::as_ref);
        let time = match &self.time {
            Some(TimeConstraint::Window(window)) => {
                Some(resolve_time_window(time_axis, window, self.stride_time)?)
            }
            Some(TimeConstraint::Range(r)) => resolve_range(time_axis, "time", Some(*r), self.stride_time)?,
            None => resolve_range(time_axis, "time", None, self.stride_time)?,
        };

        let vertical = resolve_range(
            cs.vertical_axis().map(Arc::as_ref),
            "vertical",
            self.vertical,
            self.stride_vertical,
        )?;

        let (y, x) = match &self.bbox {
            Some(bbox) => {
                let (y, x) = lat_lon_to_index(cs, bbox, self.stride_y, self.stride_x)?;
                (Some(y), Some(x))
            }
            None => (
                resolve_range(Some(cs.y_axis().as_ref()), "y", None, self.stride_y)?,
                resolve_range(Some(cs.x_axis().as_ref()), "x", None, self.stride_x)?,
            ),
        };

        Ok(AxisRanges { time, vertical, y, x })
    }
}

/// Subset `grid` by optional time and vertical index ranges, an optional
/// geographic bounding box and per-axis strides.
///
/// Equivalent to `grid.subset(..)` with a [`SubsetRequest`] whose y and x
/// strides are both `stride_xy`. No data is read.
pub fn subset(
    grid: &GeoGrid,
    time_range: Option<Range>,
    vertical_range: Option<Range>,
    bbox: Option<&LatLonRect>,
    stride_time: usize,
    stride_vertical: usize,
    stride_xy: usize,
) -> Result<GridSectionView> {
    let request = SubsetRequest {
        time: time_range.map(TimeConstraint::Range),
        vertical: vertical_range,
        bbox: bbox.copied(),
        stride_time,
        stride_vertical,
        stride_y: stride_xy,
        stride_x: stride_xy,
    };
    grid.subset(&request)
}
