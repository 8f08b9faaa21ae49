//! Common types shared across the regridding workspace.
//!
//! Everything here describes geometry and conventions, not algorithms:
//! the sentinel value, source and destination grids, bounding boxes and
//! the target depth table.

pub mod bbox;
pub mod depth;
pub mod error;
pub mod grid;
pub mod sentinel;

pub use bbox::BoundingBox;
pub use depth::DepthTable;
pub use error::{GridError, GridResult};
pub use grid::{metric_spacing, DestinationGrid, SourceGrid};
pub use sentinel::{is_sentinel, SENTINEL};
