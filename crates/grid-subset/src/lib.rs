//! Lazy Geospatial Subsetting of Gridded Datasets
//!
//! This crate computes reduced views of multi-dimensional grids
//! (time × vertical × y × x, or lower rank) without copying any data until
//! a read is requested. It enables:
//!
//! - **Geographic subsetting**: a lat/lon bounding box becomes an index
//!   rectangle, on lat/lon axes directly or through a map projection
//! - **Index and date constraints**: time and vertical ranges, per-axis strides
//! - **Identity sharing**: untouched axes, transforms and projections are
//!   shared with the parent grid
//! - **One read path**: in-memory arrays and local or remote Zarr stores
//!   behind the same [`DataSource`] trait
//!
//! # Architecture
//!
//! ```text
//! SubsetRequest
//!      │
//!      ├─► resolver: time / vertical ranges + strides
//!      │
//!      ├─► geo_index: LatLonRect ─► projection ─► y / x ranges
//!      │
//!      ▼
//! GridCoordSystem::section(AxisRanges)
//!      │
//!      ▼
//! GridSectionView (same DataSource, composed absolute ranges)
//!      │
//!      └─► read_section / read_data_slice / read_volume_data
//!               │
//!               ▼
//!          DataSource::read_slice(absolute ranges)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use grid_subset::{subset, GridDataset, Range};
//!
//! let dataset = opener.open_dataset("s3://grids/wrf.zarr").await?;
//! let grid = dataset.find_grid("T").expect("grid T");
//!
//! // Every third index along vertical, y and x
//! let view = subset(grid, None, None, None, 1, 3, 3)?;
//! let volume = view.read_volume_data(0).await?;
//! ```

pub mod axis;
pub mod config;
pub mod coord_sys;
pub mod dataset;
pub mod error;
pub mod geo_index;
pub mod grid;
pub mod range;
pub mod resolver;
pub mod source;
pub mod subset;
pub mod vertical;

// Re-export commonly used types at crate root
pub use axis::{AxisType, CoordinateAxis};
pub use config::SubsetConfig;
pub use coord_sys::{AxisRanges, GridCoordSystem, GridCoordSystemBuilder};
pub use dataset::{classify_locator, DatasetOpener, GridDataset, GridDatasetBuilder, Locator};
pub use error::{OpenError, OpenErrorKind, Result, SubsetError};
pub use geo_index::lat_lon_to_index;
pub use grid::{GeoGrid, GridSectionView, SliceDirective};
pub use range::Range;
pub use resolver::{resolve_range, resolve_time_window};
pub use source::{
    create_http_storage, create_s3_storage, DataSource, MemoryDataSource, RawArray,
    RemoteStoreConfig, ZarrDataSource,
};
pub use subset::{subset, SubsetRequest, TimeConstraint};
pub use vertical::{Surface, VerticalTransform, VerticalTransformKind};
