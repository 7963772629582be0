//! Shared test utilities for the grid-subset workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Index-encoding value generators, so every value read identifies the
//!   source index it came from
//! - Fixture dimensions for the reference grids
//! - Tracing setup for tests
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{encode_index, fixtures, init_test_tracing};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

use tracing_subscriber::EnvFilter;

/// Install a compact tracing subscriber for tests.
///
/// `RUST_LOG` overrides the default `warn` level. Safe to call from every
/// test; only the first call installs anything.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Assert that two numbers differ by at most `tol`, with an optional
/// format message for context.
///
/// ```
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(38.50000001, 38.5, 1e-6);
/// assert_approx_eq!(-97.5f32, -97.5, 0.0, "lon0 of {}", "wrf");
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($actual:expr, $expected:expr, $tol:expr $(,)?) => {
        $crate::assert_approx_eq!($actual, $expected, $tol, "values differ")
    };
    ($actual:expr, $expected:expr, $tol:expr, $($ctx:tt)+) => {{
        let (actual, expected, tol) = ($actual as f64, $expected as f64, $tol as f64);
        assert!(
            (actual - expected).abs() <= tol,
            "{}: {} vs {} (tolerance {})",
            format_args!($($ctx)+),
            actual,
            expected,
            tol
        );
    }};
}

/// [`assert_approx_eq!`] on both members of a coordinate pair, such as
/// `(x, y)` on a projection plane or `(lat, lon)`.
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($a1:expr, $a2:expr), ($e1:expr, $e2:expr), $tol:expr $(,)?) => {{
        $crate::assert_approx_eq!($a1, $e1, $tol, "first coordinate");
        $crate::assert_approx_eq!($a2, $e2, $tol, "second coordinate");
    }};
}
