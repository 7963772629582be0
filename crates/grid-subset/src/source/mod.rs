//! Raw array readers.
//!
//! A [`DataSource`] is the primitive every grid read bottoms out in: given
//! one absolute [`Range`] per dimension it returns exactly that slice. The
//! same trait is implemented over an in-memory array and over Zarr stores
//! (local or remote), so a view reads identically from either.

mod memory;
mod remote;
mod zarr;

pub use memory::MemoryDataSource;
pub use remote::{
    create_http_storage, create_s3_storage, HttpStorage, RemoteStoreConfig, S3Storage, TokioBlockOn,
};
pub use zarr::ZarrDataSource;

use async_trait::async_trait;
use ndarray::{ArrayD, Slice};

use crate::error::{Result, SubsetError};
use crate::range::Range;

/// A freshly read, owned array of grid values.
pub type RawArray = ArrayD<f32>;

/// Trait for reading index-range slices of one stored array.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Full shape of the stored array.
    fn shape(&self) -> &[usize];

    /// Read the values selected by `ranges`, one per dimension.
    ///
    /// The result has shape `ranges[d].len()` in every dimension `d`.
    async fn read_slice(&self, ranges: &[Range]) -> Result<RawArray>;
}

/// Check that `ranges` address `shape`.
pub(crate) fn check_ranges(name: &str, shape: &[usize], ranges: &[Range]) -> Result<()> {
    if ranges.len() != shape.len() {
        return Err(SubsetError::read_failure(
            name,
            format!("{} ranges given for a rank {} array", ranges.len(), shape.len()),
        ));
    }
    for (dim, (r, &n)) in ranges.iter().zip(shape).enumerate() {
        r.check_within(&format!("{}[{}]", name, dim), n)?;
    }
    Ok(())
}

/// Strided copy of `array`, where `array` holds exactly the span
/// `first..=last` of every range.
pub(crate) fn apply_strides(array: ArrayD<f32>, ranges: &[Range]) -> RawArray {
    if ranges.iter().all(|r| r.stride() == 1) {
        return array;
    }
    array
        .slice_each_axis(|ax| {
            let stride = ranges[ax.axis.index()].stride();
            Slice::new(0, None, stride as isize)
        })
        .to_owned()
}
