//! Common test fixtures for regridding tests.
//!
//! This module provides pre-defined inputs that represent common
//! scenarios in ocean and atmosphere post-processing.

use std::io::Write;

use tempfile::NamedTempFile;

/// Short depth tables (meters) for small tests.
pub mod depths {
    /// Three levels; the deepest is below most synthetic bathymetry.
    pub const SHORT: [f32; 3] = [10.0, 60.0, 200.0];

    /// Regular 5 m levels down to 50 m.
    pub const SHELF: [f32; 10] = [5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0];
}

/// Grid shapes used by benchmarks and scenario runs.
pub mod grid {
    /// Small coastal model
    pub const COASTAL: GridSpec = GridSpec {
        width: 120,
        height: 80,
        levels: 30,
    };

    /// Regional model
    pub const REGIONAL: GridSpec = GridSpec {
        width: 400,
        height: 300,
        levels: 30,
    };

    /// Simple 10x10 test grid
    pub const SIMPLE_10X10: GridSpec = GridSpec {
        width: 10,
        height: 10,
        levels: 5,
    };

    /// Shape of a layered model grid.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub width: usize,
        pub height: usize,
        pub levels: usize,
    }

    impl GridSpec {
        /// Returns the number of cells in one level.
        pub fn size(&self) -> usize {
            self.width * self.height
        }

        /// Returns the number of values in a layered field.
        pub fn volume(&self) -> usize {
            self.size() * self.levels
        }
    }
}

/// Writes `contents` to a temporary `.yaml` file that lives as long as
/// the returned handle.
pub fn write_yaml_fixture(contents: &str) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}
