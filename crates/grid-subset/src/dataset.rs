//! Dataset handles.
//!
//! A [`GridDataset`] owns the named grids of one opened dataset. Every grid
//! and every view derived from it shares the dataset's liveness flag, so
//! closing the dataset (explicitly or by dropping it) makes all later reads
//! through any of them fail with `ReadFailure`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::coord_sys::GridCoordSystem;
use crate::error::{OpenErrorKind, Result, SubsetError};
use crate::grid::GeoGrid;
use crate::source::DataSource;

/// Liveness shared between a dataset and its grids.
#[derive(Debug)]
pub(crate) struct DatasetState {
    locator: String,
    closed: AtomicBool,
}

impl DatasetState {
    fn new(locator: String) -> Self {
        Self {
            locator,
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) fn locator(&self) -> &str {
        &self.locator
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Mark closed; true if this call did the closing.
    fn close(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }
}

/// An opened dataset exposing its grids by name.
#[derive(Debug)]
pub struct GridDataset {
    state: Arc<DatasetState>,
    grids: HashMap<String, GeoGrid>,
}

impl GridDataset {
    /// Start assembling a dataset for `locator`.
    pub fn builder(locator: impl Into<String>) -> GridDatasetBuilder {
        GridDatasetBuilder {
            locator: locator.into(),
            grids: Vec::new(),
        }
    }

    pub fn locator(&self) -> &str {
        self.state.locator()
    }

    pub fn find_grid(&self, name: &str) -> Option<&GeoGrid> {
        self.grids.get(name)
    }

    /// Grid names, sorted.
    pub fn grid_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.grids.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Release the dataset. Idempotent; invalidates every grid and view
    /// obtained from it.
    pub fn close(&self) {
        if self.state.close() {
            info!(locator = %self.state.locator(), "Closed dataset");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }
}

impl Drop for GridDataset {
    fn drop(&mut self) {
        self.close();
    }
}

/// Builder registering the grids of a dataset.
pub struct GridDatasetBuilder {
    locator: String,
    grids: Vec<(String, GridCoordSystem, Arc<dyn DataSource>)>,
}

impl GridDatasetBuilder {
    /// Add a grid. Its coordinate system shape must match the source shape.
    pub fn grid(
        mut self,
        name: impl Into<String>,
        coord_sys: GridCoordSystem,
        source: Arc<dyn DataSource>,
    ) -> Self {
        self.grids.push((name.into(), coord_sys, source));
        self
    }

    pub fn build(self) -> Result<GridDataset> {
        let state = Arc::new(DatasetState::new(self.locator));
        let mut grids = HashMap::with_capacity(self.grids.len());
        for (name, coord_sys, source) in self.grids {
            if grids.contains_key(&name) {
                return Err(SubsetError::invalid_coord_system(format!(
                    "duplicate grid '{}' in dataset '{}'",
                    name,
                    state.locator()
                )));
            }
            let grid = GeoGrid::new(name.clone(), coord_sys, source, Arc::clone(&state))?;
            grids.insert(name, grid);
        }
        debug!(locator = %state.locator(), grids = grids.len(), "Opened dataset");
        Ok(GridDataset { state, grids })
    }
}

/// Opens datasets from locator strings.
///
/// Implemented by whatever knows how to turn a file path or URI into axes
/// and data sources.
#[async_trait]
pub trait DatasetOpener: Send + Sync {
    async fn open_dataset(&self, locator: &str) -> Result<GridDataset>;
}

/// Where a locator points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Local(PathBuf),
    Remote(String),
}

/// Classify a locator string as a local path or a remote URL.
///
/// `file://` URLs and bare paths are local; `http`, `https` and `s3` URLs
/// are remote. Any other scheme is `UnsupportedFormat`.
pub fn classify_locator(locator: &str) -> Result<Locator> {
    let trimmed = locator.trim();
    if trimmed.is_empty() {
        return Err(SubsetError::open(
            locator,
            OpenErrorKind::NotFound,
            "empty locator",
        ));
    }

    match trimmed.split_once("://") {
        None => Ok(Locator::Local(PathBuf::from(trimmed))),
        Some((scheme, rest)) => match scheme.to_ascii_lowercase().as_str() {
            "file" => Ok(Locator::Local(PathBuf::from(rest))),
            "http" | "https" | "s3" => Ok(Locator::Remote(trimmed.to_string())),
            other => Err(SubsetError::open(
                locator,
                OpenErrorKind::UnsupportedFormat,
                format!("unsupported scheme '{}'", other),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_locator() {
        assert_eq!(
            classify_locator("/data/ruc2.zarr").unwrap(),
            Locator::Local(PathBuf::from("/data/ruc2.zarr"))
        );
        assert_eq!(
            classify_locator("file:///data/ruc2.zarr").unwrap(),
            Locator::Local(PathBuf::from("/data/ruc2.zarr"))
        );
        assert_eq!(
            classify_locator("https://thredds.example.org/wrf.zarr").unwrap(),
            Locator::Remote("https://thredds.example.org/wrf.zarr".to_string())
        );
        assert!(matches!(
            classify_locator("s3://grids/gfs.zarr").unwrap(),
            Locator::Remote(_)
        ));
    }

    #[test]
    fn test_classify_rejects() {
        assert!(matches!(
            classify_locator("dods://server/data"),
            Err(SubsetError::Open(e)) if e.kind == OpenErrorKind::UnsupportedFormat
        ));
        assert!(matches!(
            classify_locator("  "),
            Err(SubsetError::Open(e)) if e.kind == OpenErrorKind::NotFound
        ));
    }

    #[test]
    fn test_state_closes_once() {
        let state = DatasetState::new("mem".to_string());
        assert!(!state.is_closed());
        assert!(state.close());
        assert!(!state.close());
        assert!(state.is_closed());
    }
}
