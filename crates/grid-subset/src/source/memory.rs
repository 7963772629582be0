//! In-memory data source.

use async_trait::async_trait;
use ndarray::{ArrayD, Dimension, IxDyn, Slice};

use super::{check_ranges, DataSource, RawArray};
use crate::error::{Result, SubsetError};
use crate::range::Range;

/// A data source over an array already resident in memory.
#[derive(Debug, Clone)]
pub struct MemoryDataSource {
    name: String,
    data: ArrayD<f32>,
}

impl MemoryDataSource {
    pub fn new(name: impl Into<String>, data: ArrayD<f32>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Build the array by evaluating `f` at every index of `shape`.
    pub fn from_fn(name: impl Into<String>, shape: &[usize], f: impl Fn(&[usize]) -> f32) -> Self {
        let data = ArrayD::from_shape_fn(IxDyn(shape), |idx| f(idx.slice()));
        Self::new(name, data)
    }

    /// Wrap a row-major buffer of the given shape.
    pub fn from_vec(name: impl Into<String>, shape: &[usize], values: Vec<f32>) -> Result<Self> {
        let name = name.into();
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)
            .map_err(|e| SubsetError::invalid_coord_system(format!("array '{}': {}", name, e)))?;
        Ok(Self::new(name, data))
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    async fn read_slice(&self, ranges: &[Range]) -> Result<RawArray> {
        check_ranges(&self.name, self.data.shape(), ranges)?;
        let view = self.data.slice_each_axis(|ax| {
            let r = ranges[ax.axis.index()];
            Slice::new(r.first() as isize, Some(r.last() as isize + 1), r.stride() as isize)
        });
        Ok(view.to_owned())
    }
}
