//! Axis range resolution.
//!
//! Turns the caller's time and vertical constraints plus strides into
//! concrete [`Range`]s on the axes of a coordinate system. Pure functions:
//! nothing here touches data.

use geo_common::{TimeUnits, TimeWindow};
use tracing::debug;

use crate::axis::CoordinateAxis;
use crate::error::{Result, SubsetError};
use crate::range::Range;

/// Resolve the range to apply on one axis.
///
/// * An explicit `constraint` is used as given after a bounds check; the
///   stride argument does not restride it.
/// * With no constraint, a stride above 1 selects the whole axis at that
///   stride and a stride of 1 resolves to `None` (whole axis, unchanged).
/// * A constraint for an axis the grid lacks is an `IncompatibleAxisRequest`;
///   a stride alone on a missing axis is ignored.
pub fn resolve_range(
    axis: Option<&CoordinateAxis>,
    role: &str,
    constraint: Option<Range>,
    stride: usize,
) -> Result<Option<Range>> {
    if stride == 0 {
        return Err(SubsetError::invalid_range(format!(
            "stride for the {} axis must be >= 1",
            role
        )));
    }

    let axis = match (axis, constraint) {
        (Some(axis), _) => axis,
        (None, None) => return Ok(None),
        (None, Some(r)) => {
            return Err(SubsetError::incompatible(
                role,
                format!("range {} given but the grid has no {} axis", r, role),
            ))
        }
    };

    let resolved = match constraint {
        Some(r) => {
            r.check_within(axis.name(), axis.len())?;
            Some(r)
        }
        None if stride > 1 => Some(Range::full_with_stride(axis.len(), stride)?),
        None => None,
    };

    debug!(axis = axis.name(), range = ?resolved, stride, "Resolved axis range");
    Ok(resolved)
}

/// Resolve a date window on a CF time axis to the index range of the
/// coordinate values inside it, at the given stride.
pub fn resolve_time_window(
    axis: Option<&CoordinateAxis>,
    window: &TimeWindow,
    stride: usize,
) -> Result<Range> {
    let axis = axis.ok_or_else(|| {
        SubsetError::incompatible("time", format!("window {} given but the grid has no time axis", window))
    })?;
    let units = TimeUnits::parse(axis.units()).map_err(|_| {
        SubsetError::incompatible(
            axis.name(),
            format!("units '{}' are not '<unit> since <epoch>'", axis.units()),
        )
    })?;

    let lo = units.to_value(&window.start);
    let hi = units.to_value(&window.end);
    let (first, last) = axis.value_span(lo, hi).ok_or_else(|| {
        let (a, b) = axis.coord_extent();
        SubsetError::empty_subset(
            window,
            format!("{}/{}", units.to_datetime(a).to_rfc3339(), units.to_datetime(b).to_rfc3339()),
        )
    })?;

    let range = Range::with_stride(first, last, stride)?;
    debug!(axis = axis.name(), window = %window, range = %range, "Resolved time window");
    Ok(range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::AxisType;
    use geo_common::parse_datetime;

    fn time_axis() -> CoordinateAxis {
        CoordinateAxis::regular(
            "time",
            AxisType::Time,
            "hours since 2024-01-01T00:00:00Z",
            0.0,
            6.0,
            13,
        )
        .unwrap()
    }

    #[test]
    fn test_absent_constraint_with_stride() {
        let axis = time_axis();
        assert_eq!(resolve_range(Some(&axis), "time", None, 1).unwrap(), None);

        let r = resolve_range(Some(&axis), "time", None, 3).unwrap().unwrap();
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![0, 3, 6, 9, 12]);

        let r = resolve_range(Some(&axis), "time", None, 5).unwrap().unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(r.last(), 10);
    }

    #[test]
    fn test_explicit_constraint_is_kept() {
        let axis = time_axis();
        let given = Range::new(2, 5).unwrap();
        assert_eq!(resolve_range(Some(&axis), "time", Some(given), 4).unwrap(), Some(given));

        let outside = Range::new(2, 13).unwrap();
        assert!(matches!(
            resolve_range(Some(&axis), "time", Some(outside), 1),
            Err(SubsetError::RangeOutOfBounds { size: 13, .. })
        ));
    }

    #[test]
    fn test_missing_axis() {
        assert_eq!(resolve_range(None, "vertical", None, 3).unwrap(), None);
        assert!(matches!(
            resolve_range(None, "vertical", Some(Range::single(0)), 1),
            Err(SubsetError::IncompatibleAxisRequest { axis, .. }) if axis == "vertical"
        ));
        assert!(matches!(
            resolve_range(None, "vertical", None, 0),
            Err(SubsetError::InvalidRange(_))
        ));
    }

    #[test]
    fn test_time_window() {
        let axis = time_axis();
        let window = TimeWindow::new(
            parse_datetime("2024-01-01T05:00:00Z").unwrap(),
            parse_datetime("2024-01-02T00:00:00Z").unwrap(),
        );
        let r = resolve_time_window(Some(&axis), &window, 1).unwrap();
        assert_eq!((r.first(), r.last()), (1, 4));

        let r = resolve_time_window(Some(&axis), &window, 2).unwrap();
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_time_window_failures() {
        let axis = time_axis();
        let late = TimeWindow::from_iso_interval("2025-01-01T00:00:00Z/2025-02-01T00:00:00Z").unwrap();
        assert!(matches!(
            resolve_time_window(Some(&axis), &late, 1),
            Err(SubsetError::EmptySubsetResult { .. })
        ));
        assert!(matches!(
            resolve_time_window(None, &late, 1),
            Err(SubsetError::IncompatibleAxisRequest { .. })
        ));

        let forecast_hour = CoordinateAxis::regular("fhour", AxisType::Time, "hours", 0.0, 1.0, 4).unwrap();
        assert!(matches!(
            resolve_time_window(Some(&forecast_hour), &late, 1),
            Err(SubsetError::IncompatibleAxisRequest { .. })
        ));
    }
}
