//! Error types for regridding.

use regrid_common::GridError;
use thiserror::Error;

/// Errors that can occur while configuring or running the regridding engine.
///
/// Only structurally invalid input produces an error. Missing samples,
/// land cells and below-seabed targets are represented by the sentinel
/// in the output instead.
#[derive(Error, Debug)]
pub enum RegridError {
    /// Malformed grid geometry or depth table.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// An input array does not match the grid it is supposed to align with.
    #[error("{what} has {actual} values, expected {expected}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// The native vertical coordinate cannot be mapped to depth.
    #[error("invalid sigma coordinate: {0}")]
    InvalidSigma(String),

    /// Only one time snapshot is interpolated per call.
    #[error("expected a single time snapshot, got {0}")]
    MultipleSnapshots(usize),

    /// Every source coordinate was non-finite.
    #[error("source grid has no finite coordinates")]
    NoSourcePoints,

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl RegridError {
    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Create an InvalidSigma error.
    pub fn invalid_sigma(msg: impl Into<String>) -> Self {
        Self::InvalidSigma(msg.into())
    }

    /// Create a ConfigError.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<std::io::Error> for RegridError {
    fn from(err: std::io::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<serde_yaml::Error> for RegridError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

/// Result type for regridding operations.
pub type Result<T> = std::result::Result<T, RegridError>;
