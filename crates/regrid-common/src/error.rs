//! Error types for grid geometry.

use thiserror::Error;

/// Result type alias using GridError.
pub type GridResult<T> = Result<T, GridError>;

/// Structural problems with grid geometry or the depth table.
///
/// These are always fatal at construction time: nothing downstream can
/// produce meaningful output from ambiguous geometry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("{0} is empty")]
    Empty(&'static str),

    #[error("{axis} axis is not strictly increasing at index {index} ({previous} -> {value})")]
    NotIncreasing {
        axis: &'static str,
        index: usize,
        previous: f64,
        value: f64,
    },

    #[error("{axis} contains a non-finite value at index {index}")]
    NonFinite { axis: &'static str, index: usize },

    #[error("coordinate shape mismatch: {lons} longitudes vs {lats} latitudes for a {ny}x{nx} grid")]
    ShapeMismatch {
        lons: usize,
        lats: usize,
        ny: usize,
        nx: usize,
    },

    #[error("invalid bounding box: {0}")]
    InvalidBbox(String),

    #[error("invalid grid spacing: {0}")]
    InvalidSpacing(String),
}
