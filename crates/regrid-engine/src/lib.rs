//! Regridding engine for ocean and atmosphere model output
//!
//! This crate maps fields from a model's native grid onto a regular
//! lon/lat raster, and layered ocean fields from terrain-following sigma
//! levels onto a fixed table of depths. It provides:
//!
//! - **Horizontal regridding**: nearest-point lookup built once per grid pair
//! - **Vertical resampling**: per-column linear interpolation bounded by the
//!   local water depth
//! - **Column products**: bottom, surface and depth-integrated values
//!
//! Missing, land and below-seabed cells are the single sentinel
//! [`SENTINEL`] in every output.
//!
//! # Architecture
//!
//! ```text
//! SourceGrid + DestinationGrid
//!      │
//!      ▼
//! HorizontalRegridder::new  (k-d tree, nearest index per destination cell)
//!      │
//!      ├─► interp(field 2D) ──────────────────────────► Field2D
//!      │
//!      └─► VerticalProfileResampler::new(sigma, mask, H, DepthTable)
//!               │
//!               ├─► regrid mask (fill 0) ─► WaterMask
//!               ├─► regrid bathymetry
//!               │
//!               ▼
//!          interp(Field3D, native levels)
//!               │
//!               ├─► each level horizontally (parallel over levels)
//!               ├─► each water column vertically (parallel over cells)
//!               │
//!               ▼
//!          Field3D on depth levels
//!               │
//!               └─► bottom_values / surface_values / column_sum
//! ```
//!
//! # Example
//!
//! ```ignore
//! use regrid_engine::{DepthTable, DestinationGrid, Field3D, HorizontalRegridder,
//!     SourceGrid, VerticalProfileResampler};
//!
//! let source = SourceGrid::curvilinear(lons, lats, ny, nx)?;
//! let dest = DestinationGrid::spanning(&source.inner_bbox()?, 400, 300)?;
//! let horizontal = HorizontalRegridder::new(&source, &dest)?;
//!
//! let zeta_2d = horizontal.interp(&zeta)?;
//!
//! let vertical = VerticalProfileResampler::new(
//!     &horizontal, &sigma, &mask, &h, DepthTable::standard())?;
//! let cube = vertical.interp(&Field3D::from_snapshot(temp, shape)?)?;
//! let bottom = vertical.bottom_values(&cube);
//! ```

pub mod column;
pub mod config;
pub mod error;
pub mod field;
pub mod horizontal;
pub mod interpolation;
pub mod mask;
pub mod vertical;

// Re-export commonly used types at crate root
pub use column::{bottom_values, column_sum, surface_values};
pub use config::RegridConfig;
pub use error::{RegridError, Result};
pub use field::{Field2D, Field3D};
pub use horizontal::HorizontalRegridder;
pub use interpolation::linear_interp;
pub use mask::WaterMask;
pub use vertical::VerticalProfileResampler;

pub use regrid_common::{
    is_sentinel, metric_spacing, BoundingBox, DepthTable, DestinationGrid, GridError,
    SourceGrid, SENTINEL,
};
