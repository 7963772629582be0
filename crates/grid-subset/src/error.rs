//! Error types for grid subsetting.

use std::fmt;

use geo_common::GeoError;
use projection::ProjectionError;
use thiserror::Error;

/// Why a dataset could not be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenErrorKind {
    NotFound,
    UnsupportedFormat,
    RemoteUnavailable,
}

impl fmt::Display for OpenErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotFound => "not found",
            Self::UnsupportedFormat => "unsupported format",
            Self::RemoteUnavailable => "remote unavailable",
        };
        write!(f, "{}", s)
    }
}

/// Failure to open a dataset or one of its arrays.
#[derive(Debug, Error)]
#[error("failed to open '{locator}' ({kind}): {reason}")]
pub struct OpenError {
    pub locator: String,
    pub kind: OpenErrorKind,
    pub reason: String,
}

impl OpenError {
    pub fn new(locator: impl Into<String>, kind: OpenErrorKind, reason: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            kind,
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while resolving or reading a grid subset.
#[derive(Error, Debug)]
pub enum SubsetError {
    /// The dataset is unreachable or not in a readable format.
    #[error(transparent)]
    Open(#[from] OpenError),

    /// A caller-supplied range or fixed index lies outside the axis.
    #[error("{requested} is out of bounds for axis '{axis}' of size {size}")]
    RangeOutOfBounds {
        axis: String,
        requested: String,
        size: usize,
    },

    /// A constraint is valid on its own but selects nothing on this grid.
    #[error("requested region {requested} does not intersect grid {grid}")]
    EmptySubsetResult { requested: String, grid: String },

    /// A constraint targets an axis the grid does not have, or does not fit it.
    #[error("incompatible request for axis '{axis}': {reason}")]
    IncompatibleAxisRequest { axis: String, reason: String },

    /// I/O failure during a read, including reads after the dataset was closed.
    #[error("failed to read grid '{grid}': {reason}")]
    ReadFailure { grid: String, reason: String },

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("invalid coordinate system: {0}")]
    InvalidCoordSystem(String),

    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SubsetError {
    /// Create a RangeOutOfBounds error.
    pub fn out_of_bounds(axis: impl Into<String>, requested: impl fmt::Display, size: usize) -> Self {
        Self::RangeOutOfBounds {
            axis: axis.into(),
            requested: requested.to_string(),
            size,
        }
    }

    /// Create an EmptySubsetResult error.
    pub fn empty_subset(requested: impl fmt::Display, grid: impl fmt::Display) -> Self {
        Self::EmptySubsetResult {
            requested: requested.to_string(),
            grid: grid.to_string(),
        }
    }

    /// Create an IncompatibleAxisRequest error.
    pub fn incompatible(axis: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IncompatibleAxisRequest {
            axis: axis.into(),
            reason: reason.into(),
        }
    }

    /// Create a ReadFailure error.
    pub fn read_failure(grid: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::ReadFailure {
            grid: grid.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    pub fn invalid_coord_system(msg: impl Into<String>) -> Self {
        Self::InvalidCoordSystem(msg.into())
    }

    pub fn open(locator: impl Into<String>, kind: OpenErrorKind, reason: impl Into<String>) -> Self {
        Self::Open(OpenError::new(locator, kind, reason))
    }

    /// True for errors raised while resolving a request, before any I/O.
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::RangeOutOfBounds { .. }
                | Self::EmptySubsetResult { .. }
                | Self::IncompatibleAxisRequest { .. }
                | Self::InvalidRange(_)
        )
    }
}

impl From<serde_json::Error> for SubsetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for subsetting operations.
pub type Result<T> = std::result::Result<T, SubsetError>;
