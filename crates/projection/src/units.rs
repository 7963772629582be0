//! Conversion between horizontal axis units and projection plane units.

use crate::error::{ProjectionError, Result};

fn length_in_metres(units: &str) -> Option<f64> {
    match units.trim().to_lowercase().as_str() {
        "m" | "meter" | "meters" | "metre" | "metres" => Some(1.0),
        "km" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Some(1000.0),
        _ => None,
    }
}

fn canonical_angle(units: &str) -> Option<&'static str> {
    match units.trim().to_lowercase().as_str() {
        "rad" | "radian" | "radians" => Some("radian"),
        "degrees" | "degree" | "deg" | "degrees_east" | "degrees_north" | "degree_east"
        | "degree_north" | "degrees_e" | "degrees_n" => Some("degree"),
        _ => None,
    }
}

/// Factor that converts a coordinate in `axis_units` into `plane_units`.
///
/// Lengths convert between metres and kilometres; angular units must match.
pub fn plane_scale(axis_units: &str, plane_units: &str) -> Result<f64> {
    if axis_units.trim().eq_ignore_ascii_case(plane_units.trim()) {
        return Ok(1.0);
    }
    if let (Some(a), Some(p)) = (length_in_metres(axis_units), length_in_metres(plane_units)) {
        return Ok(a / p);
    }
    match (canonical_angle(axis_units), canonical_angle(plane_units)) {
        (Some(a), Some(p)) if a == p => Ok(1.0),
        _ => Err(ProjectionError::UnitsMismatch {
            axis: axis_units.to_string(),
            plane: plane_units.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metres_to_kilometres() {
        assert_eq!(plane_scale("m", "km").unwrap(), 0.001);
        assert_eq!(plane_scale("km", "km").unwrap(), 1.0);
        assert_eq!(plane_scale("kilometers", "m").unwrap(), 1000.0);
    }

    #[test]
    fn test_angles() {
        assert_eq!(plane_scale("degrees_east", "degrees").unwrap(), 1.0);
        assert_eq!(plane_scale("rad", "radian").unwrap(), 1.0);
        assert!(plane_scale("radian", "km").is_err());
        assert!(plane_scale("hPa", "km").is_err());
    }
}
