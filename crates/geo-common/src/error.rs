//! Error types for the shared geometry and time types.

use thiserror::Error;

/// Errors raised while building or parsing geometry and time values.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("Invalid bounding box: {0}")]
    InvalidBbox(String),

    #[error(transparent)]
    BboxParse(#[from] BboxParseError),

    #[error("Invalid time units '{0}'. Expected '<unit> since <epoch>'")]
    InvalidTimeUnits(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),
}

#[derive(Debug, Error)]
pub enum BboxParseError {
    #[error("Invalid BBOX format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in BBOX: {0}")]
    InvalidNumber(String),
}
