//! Common test fixtures.
//!
//! Dimensions and coordinates of the reference grids used across the test
//! suite: a RUC-style lat/lon grid, a WRF-style Lambert conformal grid and
//! a coarse global grid that runs all the way around in longitude.

use std::path::PathBuf;

use tempfile::TempDir;

/// RUC-style regional lat/lon grid on isobaric levels.
pub mod ruc {
    pub const TIMES: usize = 2;
    pub const LEVELS: usize = 19;
    pub const NLAT: usize = 22;
    pub const NLON: usize = 31;

    pub const SHAPE: [usize; 4] = [TIMES, LEVELS, NLAT, NLON];

    pub const LAT_START: f64 = 20.0;
    pub const LON_START: f64 = -130.0;
    /// Grid spacing in degrees, both axes
    pub const SPACING: f64 = 2.0;

    /// Hours between time steps
    pub const TIME_STEP_HOURS: f64 = 3.0;

    /// Isobaric levels in hPa, surface first
    pub const LEVELS_HPA: [f64; LEVELS] = [
        1000.0, 975.0, 950.0, 925.0, 900.0, 850.0, 800.0, 750.0, 700.0, 650.0, 600.0, 550.0,
        500.0, 450.0, 400.0, 350.0, 300.0, 250.0, 200.0,
    ];
}

/// WRF-style Lambert conformal grid on sigma levels.
pub mod wrf {
    pub const TIMES: usize = 13;
    pub const LEVELS: usize = 27;
    pub const NY: usize = 60;
    pub const NX: usize = 73;

    pub const SHAPE: [usize; 4] = [TIMES, LEVELS, NY, NX];

    /// First x coordinate, km
    pub const X_START: f64 = -1080.0;
    /// First y coordinate, km
    pub const Y_START: f64 = -885.0;
    /// Grid spacing, km
    pub const SPACING: f64 = 30.0;

    /// Projection origin and standard parallel
    pub const LAT0: f64 = 38.5;
    pub const LON0: f64 = -97.5;

    /// Model top pressure, Pa
    pub const PTOP: f64 = 5000.0;
}

/// Global grid on 10° latitudes and 4° longitudes, 0..356.
///
/// Kept under 100 columns so every cell fits [`encode_index`](crate::encode_index).
pub mod global {
    pub const NLAT: usize = 19;
    pub const NLON: usize = 90;

    pub const LAT_START: f64 = -90.0;
    pub const LAT_SPACING: f64 = 10.0;
    pub const LON_START: f64 = 0.0;
    pub const LON_SPACING: f64 = 4.0;
}

/// Time fixtures.
pub mod time {
    /// Epoch of the fixture time axes
    pub const REFERENCE_TIME: &str = "2003-06-12T19:00:00Z";

    /// CF units of the fixture time axes
    pub const HOURS_SINCE_REFERENCE: &str = "hours since 2003-06-12T19:00:00Z";
}

/// Bounding boxes as `(lat_min, lon_min, dlat, dlon)`.
pub mod bbox {
    /// Inside both the RUC and the WRF fixture
    pub const KANSAS: (f64, f64, f64, f64) = (36.0, -102.0, 6.0, 8.0);

    /// South Pacific, outside both regional fixtures
    pub const SOUTH_PACIFIC: (f64, f64, f64, f64) = (-50.0, -170.0, 20.0, 30.0);

    /// Runs across the ±180° meridian
    pub const DATELINE: (f64, f64, f64, f64) = (-10.0, 170.0, 20.0, 20.0);
}

/// Temporary directory holding a path for a Zarr store.
///
/// Keep the returned `TempDir` alive for as long as the store is used.
pub fn temp_zarr_store(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join(name);
    (dir, path)
}
