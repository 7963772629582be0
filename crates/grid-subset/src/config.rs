//! Configuration for the subsetting engine.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SubsetError};

/// Tuning knobs for geographic resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsetConfig {
    /// Extra sample points per lat/lon rectangle edge when projecting onto a
    /// non-rectilinear plane.
    pub boundary_samples: usize,

    /// Sample points per plane rectangle edge when computing the lat/lon
    /// bounding box of a projected grid.
    pub lat_lon_bounds_samples: usize,

    /// Relative tolerance of the map-area cross-check.
    pub map_area_tolerance: f64,
}

impl Default for SubsetConfig {
    fn default() -> Self {
        Self {
            boundary_samples: 32,
            lat_lon_bounds_samples: 32,
            map_area_tolerance: 1e-9,
        }
    }
}

impl SubsetConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_SUBSET_BOUNDARY_SAMPLES") {
            if let Ok(n) = val.parse() {
                config.boundary_samples = n;
            }
        }

        if let Ok(val) = std::env::var("GRID_SUBSET_LATLON_SAMPLES") {
            if let Ok(n) = val.parse() {
                config.lat_lon_bounds_samples = n;
            }
        }

        if let Ok(val) = std::env::var("GRID_SUBSET_MAP_AREA_TOLERANCE") {
            if let Ok(tol) = val.parse() {
                config.map_area_tolerance = tol;
            }
        }

        config
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate().map_err(SubsetError::Config)?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.boundary_samples == 0 {
            return Err("boundary_samples must be > 0".to_string());
        }

        if self.lat_lon_bounds_samples == 0 {
            return Err("lat_lon_bounds_samples must be > 0".to_string());
        }

        if !self.map_area_tolerance.is_finite() || self.map_area_tolerance < 0.0 {
            return Err("map_area_tolerance must be finite and >= 0".to_string());
        }

        Ok(())
    }
}
