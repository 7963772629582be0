//! Zarr V3 data source.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ndarray::{ArrayD, IxDyn};
use tracing::{debug, trace};
use zarrs::array::{Array, DataType};
use zarrs::array_subset::ArraySubset;
use zarrs::storage::ReadableStorageTraits;
use zarrs_filesystem::FilesystemStore;

use super::{apply_strides, check_ranges, DataSource, RawArray};
use crate::error::{OpenErrorKind, Result, SubsetError};
use crate::range::Range;

/// A `float32` Zarr array read through any zarrs storage backend.
///
/// Each read fetches the bounding subset of the requested ranges (only the
/// chunks that intersect it) and applies the strides in memory. Remote
/// stores wrapped with [`TokioBlockOn`](super::TokioBlockOn) must be read
/// from a multi-threaded tokio runtime.
pub struct ZarrDataSource<S: ?Sized + ReadableStorageTraits + 'static> {
    array: Array<S>,
    /// Array path within the store (used in diagnostics)
    path: String,
    shape: Vec<usize>,
}

impl<S: ?Sized + ReadableStorageTraits + 'static> ZarrDataSource<S> {
    /// Open the array at `path` in `storage`.
    pub fn open(storage: Arc<S>, path: &str) -> Result<Self> {
        let array = Array::open(storage, path).map_err(|e| {
            SubsetError::open(path, OpenErrorKind::UnsupportedFormat, e.to_string())
        })?;

        if array.data_type() != &DataType::Float32 {
            return Err(SubsetError::open(
                path,
                OpenErrorKind::UnsupportedFormat,
                format!("data type {:?} is not float32", array.data_type()),
            ));
        }

        let shape = array.shape().iter().map(|&n| n as usize).collect::<Vec<_>>();
        debug!(path = path, shape = ?shape, "Opened Zarr array");
        Ok(Self {
            array,
            path: path.to_string(),
            shape,
        })
    }

    fn read_sync(&self, ranges: &[Range]) -> Result<RawArray> {
        let start: Vec<u64> = ranges.iter().map(|r| r.first() as u64).collect();
        let span: Vec<usize> = ranges.iter().map(|r| r.span()).collect();
        let subset = ArraySubset::new_with_start_shape(start, span.iter().map(|&n| n as u64).collect())
            .map_err(|e| SubsetError::read_failure(&self.path, e))?;

        trace!(path = %self.path, subset = ?subset, "Retrieving array subset");
        let data: Vec<f32> = self
            .array
            .retrieve_array_subset_elements(&subset)
            .map_err(|e| SubsetError::read_failure(&self.path, e))?;

        let block = ArrayD::from_shape_vec(IxDyn(&span), data)
            .map_err(|e| SubsetError::read_failure(&self.path, e))?;
        Ok(apply_strides(block, ranges))
    }
}

impl ZarrDataSource<FilesystemStore> {
    /// Open an array from a Zarr store directory on local disk.
    pub fn open_local(store_dir: impl AsRef<Path>, path: &str) -> Result<Self> {
        let dir = store_dir.as_ref();
        let locator = dir.display().to_string();
        if !dir.is_dir() {
            return Err(SubsetError::open(
                locator,
                OpenErrorKind::NotFound,
                "no such directory",
            ));
        }
        let store = FilesystemStore::new(dir)
            .map_err(|e| SubsetError::open(locator, OpenErrorKind::NotFound, e.to_string()))?;
        Self::open(Arc::new(store), path)
    }
}

#[async_trait]
impl<S: ?Sized + ReadableStorageTraits + 'static> DataSource for ZarrDataSource<S> {
    fn name(&self) -> &str {
        &self.path
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    async fn read_slice(&self, ranges: &[Range]) -> Result<RawArray> {
        check_ranges(&self.path, &self.shape, ranges)?;
        self.read_sync(ranges)
    }
}
