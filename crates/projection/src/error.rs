//! Error types for projection construction and unit handling.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProjectionError>;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Invalid {projection} parameter: {message}")]
    InvalidParameter {
        projection: &'static str,
        message: String,
    },

    #[error("Cannot convert axis units '{axis}' to plane units '{plane}'")]
    UnitsMismatch { axis: String, plane: String },
}

impl ProjectionError {
    pub fn invalid(projection: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            projection,
            message: message.into(),
        }
    }
}
