//! Time handling for CF-style time coordinates.
//!
//! Time axes carry their values as offsets from an epoch, described by a unit
//! string such as `"hours since 2003-06-12T19:00:00Z"`.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// Parse an ISO 8601-ish timestamp, assuming UTC when no zone is given.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, GeoError> {
    let s = s.trim();

    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let bare = s
        .strip_suffix('Z')
        .or_else(|| s.strip_suffix(" UTC"))
        .unwrap_or(s)
        .trim();

    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(bare, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Date only
    if let Ok(date) = NaiveDate::parse_from_str(bare, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(GeoError::InvalidTime(s.to_string()))
}

/// Unit of a CF time offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(Self::Seconds),
            "min" | "mins" | "minute" | "minutes" => Some(Self::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(Self::Hours),
            "d" | "day" | "days" => Some(Self::Days),
            _ => None,
        }
    }

    pub fn seconds(&self) -> f64 {
        match self {
            Self::Seconds => 1.0,
            Self::Minutes => 60.0,
            Self::Hours => 3600.0,
            Self::Days => 86400.0,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
        };
        write!(f, "{}", s)
    }
}

/// Parsed `"<unit> since <epoch>"` unit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeUnits {
    pub unit: TimeUnit,
    pub epoch: DateTime<Utc>,
}

impl TimeUnits {
    pub fn parse(units: &str) -> Result<Self, GeoError> {
        let (unit, epoch) = units
            .split_once(" since ")
            .ok_or_else(|| GeoError::InvalidTimeUnits(units.to_string()))?;
        let unit =
            TimeUnit::from_str(unit).ok_or_else(|| GeoError::InvalidTimeUnits(units.to_string()))?;
        let epoch = parse_datetime(epoch)?;
        Ok(Self { unit, epoch })
    }

    /// Whether a unit string looks like a CF time unit.
    pub fn is_time_units(units: &str) -> bool {
        Self::parse(units).is_ok()
    }

    /// Date of a coordinate value.
    pub fn to_datetime(&self, value: f64) -> DateTime<Utc> {
        let millis = (value * self.unit.seconds() * 1000.0).round() as i64;
        self.epoch + Duration::milliseconds(millis)
    }

    /// Coordinate value of a date.
    pub fn to_value(&self, dt: &DateTime<Utc>) -> f64 {
        let millis = (*dt - self.epoch).num_milliseconds() as f64;
        millis / 1000.0 / self.unit.seconds()
    }
}

impl fmt::Display for TimeUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} since {}", self.unit, self.epoch.to_rfc3339())
    }
}

/// An inclusive window of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Parse "start/end" or a single instant.
    pub fn from_iso_interval(s: &str) -> Result<Self, GeoError> {
        if let Some((start, end)) = s.split_once('/') {
            return Ok(Self::new(parse_datetime(start)?, parse_datetime(end)?));
        }
        let dt = parse_datetime(s)?;
        Ok(Self::new(dt, dt))
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        dt >= &self.start && dt <= &self.end
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
