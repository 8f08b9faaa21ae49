//! Shared test utilities for the regridding workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic grid, mask, bathymetry and profile generators
//! - Common test fixtures (bounding boxes, depth tables, scenario shapes)
//! - Approximate-equality assertion macros
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
//! use test_utils::{assert_approx_eq, create_curvilinear_grid, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Assert that every value of a slice equals the given missing marker.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_all_eq;
///
/// assert_all_eq!(&column, 1.0e37_f32);
/// ```
#[macro_export]
macro_rules! assert_all_eq {
    ($values:expr, $expected:expr) => {{
        let expected = $expected;
        for (i, v) in $values.iter().enumerate() {
            if *v != expected {
                panic!(
                    "assertion failed: value at index {} is `{:?}`, expected `{:?}`",
                    i, v, expected
                );
            }
        }
    }};
}
