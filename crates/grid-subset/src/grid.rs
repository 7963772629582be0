//! Grids and lazy section views.
//!
//! A [`GeoGrid`] binds a coordinate system to a data source and holds, for
//! every dimension, the absolute [`Range`] of the source it covers. A grid
//! fresh from a dataset covers the whole source; subsetting produces a new
//! grid (a [`GridSectionView`]) over the same source with composed ranges.
//! Nothing is read until one of the `read_*` methods is awaited.

use std::fmt;
use std::sync::Arc;

use ndarray::Axis;
use tracing::{debug, trace};

use crate::axis::CoordinateAxis;
use crate::coord_sys::GridCoordSystem;
use crate::dataset::DatasetState;
use crate::error::{Result, SubsetError};
use crate::range::Range;
use crate::source::{DataSource, RawArray};
use crate::subset::SubsetRequest;

/// A grid whose coordinate system and ranges are the result of a subset.
pub type GridSectionView = GeoGrid;

/// Per-dimension read directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceDirective {
    /// Keep every index of the view along this dimension
    All,
    /// Fix this dimension to one index of the view and drop it from the result
    Fixed(usize),
}

/// A named variable with its coordinate system and data source.
#[derive(Clone)]
pub struct GeoGrid {
    name: String,
    coord_sys: Arc<GridCoordSystem>,
    source: Arc<dyn DataSource>,
    /// Absolute ranges into `source`, one per dimension
    section: Vec<Range>,
    dataset: Arc<DatasetState>,
}

impl fmt::Debug for GeoGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoGrid")
            .field("name", &self.name)
            .field("shape", &self.shape())
            .field("section", &self.section)
            .field("source", &self.source.name())
            .field("dataset", &self.dataset.locator())
            .finish()
    }
}

impl GeoGrid {
    pub(crate) fn new(
        name: impl Into<String>,
        coord_sys: GridCoordSystem,
        source: Arc<dyn DataSource>,
        dataset: Arc<DatasetState>,
    ) -> Result<Self> {
        let name = name.into();
        let shape = coord_sys.shape();
        if shape.as_slice() != source.shape() {
            return Err(SubsetError::invalid_coord_system(format!(
                "grid '{}' has shape {:?} but its data source '{}' has shape {:?}",
                name,
                shape,
                source.name(),
                source.shape()
            )));
        }
        let section = shape
            .iter()
            .map(|&n| Range::full(n))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name,
            coord_sys: Arc::new(coord_sys),
            source,
            section,
            dataset,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coord_sys(&self) -> &GridCoordSystem {
        &self.coord_sys
    }

    pub fn rank(&self) -> usize {
        self.section.len()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.section.iter().map(Range::len).collect()
    }

    /// Absolute ranges of the data source covered by this grid.
    pub fn section(&self) -> &[Range] {
        &self.section
    }

    pub fn data_source(&self) -> &Arc<dyn DataSource> {
        &self.source
    }

    /// True once the owning dataset has been closed.
    pub fn is_closed(&self) -> bool {
        self.dataset.is_closed()
    }

    /// A lazy view of this grid restricted by `request`.
    ///
    /// All constraints are resolved against this grid's own coordinate
    /// system, so subsetting a view is relative to the view. No data is read.
    pub fn subset(&self, request: &SubsetRequest) -> Result<GridSectionView> {
        let ranges = request.resolve(&self.coord_sys)?;
        let coord_sys = self.coord_sys.section(&ranges)?;

        let relative = [
            self.coord_sys.time_axis().map(|_| ranges.time),
            self.coord_sys.vertical_axis().map(|_| ranges.vertical),
            Some(ranges.y),
            Some(ranges.x),
        ];
        let section = relative
            .into_iter()
            .flatten()
            .zip(&self.section)
            .zip(self.coord_sys.axes())
            .map(|((rel, outer), axis)| match rel {
                None => Ok(*outer),
                Some(r) => outer
                    .compose(&r)
                    .ok_or_else(|| SubsetError::out_of_bounds(axis.name(), r, outer.len())),
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            grid = %self.name,
            shape = ?coord_sys.shape(),
            section = ?section,
            "Built grid section view"
        );
        Ok(Self {
            name: self.name.clone(),
            coord_sys: Arc::new(coord_sys),
            source: Arc::clone(&self.source),
            section,
            dataset: Arc::clone(&self.dataset),
        })
    }

    /// Read the view with one directive per dimension.
    ///
    /// Fixed indices are relative to the view. Fixed dimensions are dropped
    /// from the result; the others keep their full view length.
    pub async fn read_section(&self, directives: &[SliceDirective]) -> Result<RawArray> {
        if directives.len() != self.rank() {
            return Err(SubsetError::incompatible(
                &self.name,
                format!("{} directives for a rank {} grid", directives.len(), self.rank()),
            ));
        }

        let axes = self.coord_sys.axes();
        let absolute = directives
            .iter()
            .zip(&self.section)
            .zip(&axes)
            .map(|((directive, range), axis)| match *directive {
                SliceDirective::All => Ok(*range),
                SliceDirective::Fixed(i) => range
                    .element(i)
                    .map(Range::single)
                    .ok_or_else(|| SubsetError::out_of_bounds(axis.name(), i, range.len())),
            })
            .collect::<Result<Vec<_>>>()?;

        self.ensure_open()?;
        trace!(grid = %self.name, ranges = ?absolute, "Reading slice");
        let mut data = self.source.read_slice(&absolute).await?;
        self.ensure_open()?;

        let expected: Vec<usize> = absolute.iter().map(Range::len).collect();
        if data.shape() != expected.as_slice() {
            return Err(SubsetError::read_failure(
                &self.name,
                format!("source returned shape {:?}, expected {:?}", data.shape(), expected),
            ));
        }

        for (d, directive) in directives.iter().enumerate().rev() {
            if let SliceDirective::Fixed(_) = directive {
                data = data.index_axis_move(Axis(d), 0);
            }
        }
        Ok(data)
    }

    /// Read with integer directives in `(t, z, y, x)` order: `-1` keeps the
    /// whole dimension, a non-negative value fixes it. Arguments for axes the
    /// grid does not have are ignored.
    pub async fn read_data_slice(&self, t: i32, z: i32, y: i32, x: i32) -> Result<RawArray> {
        let cs = &self.coord_sys;
        let mut directives = Vec::with_capacity(4);
        if let Some(axis) = cs.time_axis() {
            directives.push(directive(t, axis)?);
        }
        if let Some(axis) = cs.vertical_axis() {
            directives.push(directive(z, axis)?);
        }
        directives.push(directive(y, cs.y_axis())?);
        directives.push(directive(x, cs.x_axis())?);
        self.read_section(&directives).await
    }

    /// Every dimension but time, at view time index `t`.
    pub async fn read_volume_data(&self, t: usize) -> Result<RawArray> {
        if self.coord_sys.time_axis().is_none() {
            return Err(SubsetError::incompatible(
                "time",
                format!("grid '{}' has no time axis", self.name),
            ));
        }
        let mut directives = vec![SliceDirective::All; self.rank()];
        directives[0] = SliceDirective::Fixed(t);
        self.read_section(&directives).await
    }

    /// The horizontal plane at view indices `t` and `z`; either is ignored
    /// when the grid lacks that axis.
    pub async fn read_yx_data(&self, t: usize, z: usize) -> Result<RawArray> {
        let cs = &self.coord_sys;
        let mut directives = Vec::with_capacity(4);
        if cs.time_axis().is_some() {
            directives.push(SliceDirective::Fixed(t));
        }
        if cs.vertical_axis().is_some() {
            directives.push(SliceDirective::Fixed(z));
        }
        directives.extend([SliceDirective::All, SliceDirective::All]);
        self.read_section(&directives).await
    }

    fn ensure_open(&self) -> Result<()> {
        if self.dataset.is_closed() {
            return Err(SubsetError::read_failure(
                &self.name,
                format!("dataset '{}' is closed", self.dataset.locator()),
            ));
        }
        Ok(())
    }
}

fn directive(value: i32, axis: &CoordinateAxis) -> Result<SliceDirective> {
    match value {
        -1 => Ok(SliceDirective::All),
        v if v >= 0 => Ok(SliceDirective::Fixed(v as usize)),
        v => Err(SubsetError::out_of_bounds(axis.name(), v, axis.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisType;
    use crate::dataset::GridDataset;
    use crate::source::MemoryDataSource;

    fn grid() -> (GridDataset, GeoGrid) {
        let level = CoordinateAxis::irregular("level", AxisType::Vertical, "hPa", vec![850.0, 700.0, 500.0, 300.0])
            .unwrap();
        let lat = CoordinateAxis::regular("lat", AxisType::Lat, "degrees_north", 0.0, 1.0, 3).unwrap();
        let lon = CoordinateAxis::regular("lon", AxisType::Lon, "degrees_east", 0.0, 1.0, 5).unwrap();
        let cs = GridCoordSystem::builder(lat, lon).vertical(level).build().unwrap();
        let source = MemoryDataSource::from_fn("t", &[4, 3, 5], |idx| (idx[0] * 100 + idx[1] * 10 + idx[2]) as f32);
        let dataset = GridDataset::builder("mem://t")
            .grid("t", cs, Arc::new(source))
            .build()
            .unwrap();
        let grid = dataset.find_grid("t").unwrap().clone();
        (dataset, grid)
    }

    #[test]
    fn test_compose_failure_names_axis() {
        let (_dataset, mut grid) = grid();
        // a section narrower than its coordinate system
        grid.section[0] = Range::new(0, 1).unwrap();
        let err = grid
            .subset(&SubsetRequest::new().vertical_range(Range::new(2, 3).unwrap()))
            .unwrap_err();
        assert!(
            matches!(err, SubsetError::RangeOutOfBounds { ref axis, size: 2, .. } if axis == "level"),
            "got {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_read_section_drops_fixed_dims() {
        let (_dataset, grid) = grid();
        let view = grid
            .subset(&SubsetRequest::new().vertical_range(Range::with_stride(1, 3, 2).unwrap()))
            .unwrap();
        let data = view
            .read_section(&[SliceDirective::Fixed(1), SliceDirective::All, SliceDirective::Fixed(4)])
            .await
            .unwrap();
        assert_eq!(data.shape(), &[3]);
        assert_eq!(data.iter().copied().collect::<Vec<_>>(), vec![304.0, 314.0, 324.0]);
    }
}
