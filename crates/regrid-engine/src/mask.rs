//! Water/land classification of destination cells.

use crate::error::Result;
use crate::field::Field2D;

/// Binary water mask on the destination grid (1 = water, 0 = land).
///
/// Built once per vertical resampler and never modified afterwards; the
/// flat indices of water cells are cached for the per-cell loops.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterMask {
    values: Field2D,
    water: Vec<usize>,
}

impl WaterMask {
    /// Classify a regridded mask field. Only cells exactly equal to 1 are water.
    pub fn from_field(values: Field2D) -> Self {
        let water = values
            .data()
            .iter()
            .enumerate()
            .filter_map(|(i, &v)| (v == 1.0).then_some(i))
            .collect();
        Self { values, water }
    }

    /// Build a mask directly from destination-grid values.
    pub fn from_values(data: Vec<f32>, width: usize, height: usize) -> Result<Self> {
        Ok(Self::from_field(Field2D::new(data, width, height)?))
    }

    /// The 0/1 mask values, suitable for archiving.
    pub fn values(&self) -> &Field2D {
        &self.values
    }

    /// Flat indices of water cells, ascending.
    pub fn water_indices(&self) -> &[usize] {
        &self.water
    }

    pub fn water_count(&self) -> usize {
        self.water.len()
    }

    #[inline]
    pub fn is_water(&self, cell: usize) -> bool {
        self.values.data().get(cell).is_some_and(|&v| v == 1.0)
    }

    /// Shape as (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
