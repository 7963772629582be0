//! Common geometry and time types shared across the grid-subset workspace.

pub mod bbox;
pub mod error;
pub mod time;

pub use bbox::{
    lon_from_base, normalize_lon, LatLonPoint, LatLonRect, ProjectionPoint, ProjectionRect,
};
pub use error::{BboxParseError, GeoError};
pub use time::{parse_datetime, TimeUnit, TimeUnits, TimeWindow};
