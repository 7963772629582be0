//! One-dimensional coordinate axes.
//!
//! An axis is a strictly monotonic sequence of coordinate values, stored
//! either as a regular `start + i * increment` encoding or as explicit
//! values. Index lookups treat each value as the centre of a cell whose
//! edges lie halfway to its neighbours.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SubsetError};
use crate::range::Range;

/// Role of an axis within a grid coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisType {
    Time,
    Vertical,
    /// Projected plane y
    GeoY,
    /// Projected plane x
    GeoX,
    Lat,
    Lon,
}

impl AxisType {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::GeoY | Self::GeoX | Self::Lat | Self::Lon)
    }

    pub fn is_y(&self) -> bool {
        matches!(self, Self::GeoY | Self::Lat)
    }

    pub fn is_x(&self) -> bool {
        matches!(self, Self::GeoX | Self::Lon)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Vertical => "vertical",
            Self::GeoY => "y",
            Self::GeoX => "x",
            Self::Lat => "lat",
            Self::Lon => "lon",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum AxisValues {
    Regular {
        start: f64,
        increment: f64,
        count: usize,
    },
    Irregular(Vec<f64>),
}

/// An immutable coordinate axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateAxis {
    name: String,
    axis_type: AxisType,
    units: String,
    values: AxisValues,
}

#[allow(clippy::len_without_is_empty)]
impl CoordinateAxis {
    /// Axis with values `start + i * increment` for `i` in `0..count`.
    pub fn regular(
        name: impl Into<String>,
        axis_type: AxisType,
        units: impl Into<String>,
        start: f64,
        increment: f64,
        count: usize,
    ) -> Result<Self> {
        let name = name.into();
        if count == 0 {
            return Err(SubsetError::invalid_coord_system(format!(
                "axis '{}' has no values",
                name
            )));
        }
        if !start.is_finite() || !increment.is_finite() || increment == 0.0 {
            return Err(SubsetError::invalid_coord_system(format!(
                "axis '{}' needs a finite start and a non-zero increment",
                name
            )));
        }
        Ok(Self {
            name,
            axis_type,
            units: units.into(),
            values: AxisValues::Regular {
                start,
                increment,
                count,
            },
        })
    }

    /// Axis with explicit, strictly monotonic values.
    pub fn irregular(
        name: impl Into<String>,
        axis_type: AxisType,
        units: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();
        if values.is_empty() {
            return Err(SubsetError::invalid_coord_system(format!(
                "axis '{}' has no values",
                name
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SubsetError::invalid_coord_system(format!(
                "axis '{}' has non-finite values",
                name
            )));
        }
        let ascending = values.windows(2).all(|w| w[1] > w[0]);
        let descending = values.windows(2).all(|w| w[1] < w[0]);
        if !ascending && !descending {
            return Err(SubsetError::invalid_coord_system(format!(
                "axis '{}' is not strictly monotonic",
                name
            )));
        }
        Ok(Self {
            name,
            axis_type,
            units: units.into(),
            values: AxisValues::Irregular(values),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn axis_type(&self) -> AxisType {
        self.axis_type
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn len(&self) -> usize {
        match &self.values {
            AxisValues::Regular { count, .. } => *count,
            AxisValues::Irregular(v) => v.len(),
        }
    }

    pub fn is_regular(&self) -> bool {
        matches!(self.values, AxisValues::Regular { .. })
    }

    /// Spacing of a regular axis.
    pub fn increment(&self) -> Option<f64> {
        match self.values {
            AxisValues::Regular { increment, .. } => Some(increment),
            AxisValues::Irregular(_) => None,
        }
    }

    pub fn value(&self, i: usize) -> Option<f64> {
        match &self.values {
            AxisValues::Regular {
                start,
                increment,
                count,
            } => (i < *count).then(|| start + i as f64 * increment),
            AxisValues::Irregular(v) => v.get(i).copied(),
        }
    }

    pub fn values(&self) -> Vec<f64> {
        match &self.values {
            AxisValues::Regular { .. } => (0..self.len()).filter_map(|i| self.value(i)).collect(),
            AxisValues::Irregular(v) => v.clone(),
        }
    }

    pub fn is_ascending(&self) -> bool {
        match &self.values {
            AxisValues::Regular { increment, .. } => *increment > 0.0,
            AxisValues::Irregular(v) => v.len() < 2 || v[1] > v[0],
        }
    }

    fn at(&self, i: usize) -> f64 {
        match &self.values {
            AxisValues::Regular {
                start, increment, ..
            } => start + i as f64 * increment,
            AxisValues::Irregular(v) => v[i],
        }
    }

    /// Boundary between cell `i - 1` and cell `i`, for `i` in `0..=len`.
    pub fn edge(&self, i: usize) -> f64 {
        let n = self.len();
        match &self.values {
            AxisValues::Regular {
                start, increment, ..
            } => start + (i as f64 - 0.5) * increment,
            AxisValues::Irregular(v) if n == 1 => v[0],
            AxisValues::Irregular(v) => {
                if i == 0 {
                    v[0] - (v[1] - v[0]) / 2.0
                } else if i >= n {
                    v[n - 1] + (v[n - 1] - v[n - 2]) / 2.0
                } else {
                    (v[i - 1] + v[i]) / 2.0
                }
            }
        }
    }

    /// `(min, max)` of the coordinate values.
    pub fn coord_extent(&self) -> (f64, f64) {
        let a = self.at(0);
        let b = self.at(self.len() - 1);
        (a.min(b), a.max(b))
    }

    /// `(min, max)` of the outer cell edges.
    pub fn extent(&self) -> (f64, f64) {
        let a = self.edge(0);
        let b = self.edge(self.len());
        (a.min(b), a.max(b))
    }

    /// Index of the cell containing `coord`, if any.
    pub fn find_index(&self, coord: f64) -> Option<usize> {
        let (lo, hi) = self.extent();
        if !(lo..=hi).contains(&coord) {
            return None;
        }
        let (first, _) = self.index_span(coord, coord)?;
        Some(first)
    }

    /// Contiguous index span of the cells overlapping `[lo, hi]`.
    ///
    /// A cell is selected when its overlap with the interval has positive
    /// length, or when the interval is a single point inside the cell.
    /// Touching only at an edge selects nothing.
    pub fn index_span(&self, lo: f64, hi: f64) -> Option<(usize, usize)> {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let n = self.len();
        let point = lo == hi;

        let (first, end) = if self.is_ascending() {
            // cell i is [edge(i), edge(i + 1)]
            let first = partition_point(n, |i| {
                let upper = self.edge(i + 1);
                if point { upper < lo } else { upper <= lo }
            });
            let end = partition_point(n, |i| {
                let lower = self.edge(i);
                if point { lower <= hi } else { lower < hi }
            });
            (first, end)
        } else {
            // cell i is [edge(i + 1), edge(i)]
            let first = partition_point(n, |i| {
                let lower = self.edge(i + 1);
                if point { lower > hi } else { lower >= hi }
            });
            let end = partition_point(n, |i| {
                let upper = self.edge(i);
                if point { upper >= lo } else { upper > lo }
            });
            (first, end)
        };

        (first < end).then(|| (first, end - 1))
    }

    /// Indices whose coordinate value lies in `[lo, hi]`.
    pub fn value_span(&self, lo: f64, hi: f64) -> Option<(usize, usize)> {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let n = self.len();
        let (first, end) = if self.is_ascending() {
            (
                partition_point(n, |i| self.at(i) < lo),
                partition_point(n, |i| self.at(i) <= hi),
            )
        } else {
            (
                partition_point(n, |i| self.at(i) > hi),
                partition_point(n, |i| self.at(i) >= lo),
            )
        };
        (first < end).then(|| (first, end - 1))
    }

    /// New axis holding the values selected by `range`.
    pub fn section(&self, range: &Range) -> Result<CoordinateAxis> {
        range.check_within(&self.name, self.len())?;
        let values = match &self.values {
            AxisValues::Regular {
                start, increment, ..
            } => AxisValues::Regular {
                start: start + range.first() as f64 * increment,
                increment: increment * range.stride() as f64,
                count: range.len(),
            },
            AxisValues::Irregular(v) => AxisValues::Irregular(range.iter().map(|i| v[i]).collect()),
        };
        Ok(Self {
            name: self.name.clone(),
            axis_type: self.axis_type,
            units: self.units.clone(),
            values,
        })
    }
}

/// First index in `0..n` for which `pred` is false; `pred` must be true on
/// a prefix and false afterwards.
fn partition_point(n: usize, pred: impl Fn(usize) -> bool) -> usize {
    let (mut lo, mut hi) = (0, n);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(mid) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}
