//! Row-major value arrays produced and consumed by the engine.

use crate::error::{RegridError, Result};

/// A single-level field, row-major with shape (height, width).
#[derive(Debug, Clone, PartialEq)]
pub struct Field2D {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl Field2D {
    /// Wrap `data`, checking that it holds exactly `height * width` values.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> Result<Self> {
        if data.len() != width * height {
            return Err(RegridError::shape_mismatch(
                format!("{}x{} field", height, width),
                width * height,
                data.len(),
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// A field where every cell holds `value`.
    pub fn filled(value: f32, width: usize, height: usize) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Wrap `data` whose length the caller already guarantees.
    pub(crate) fn from_parts(data: Vec<f32>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Shape as (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Get the value at a specific grid coordinate.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A single time snapshot of a layered field.
///
/// Stored level-major: level `k` occupies `data[k * plane .. (k + 1) * plane]`
/// where `plane = height * width`. Levels are either native model levels
/// (before vertical resampling) or depth-table levels (after).
#[derive(Debug, Clone, PartialEq)]
pub struct Field3D {
    data: Vec<f32>,
    levels: usize,
    height: usize,
    width: usize,
}

impl Field3D {
    pub fn new(data: Vec<f32>, levels: usize, height: usize, width: usize) -> Result<Self> {
        if levels == 0 {
            return Err(RegridError::shape_mismatch("layered field levels", 1, 0));
        }
        let expected = levels * height * width;
        if data.len() != expected {
            return Err(RegridError::shape_mismatch(
                format!("{}x{}x{} field", levels, height, width),
                expected,
                data.len(),
            ));
        }
        Ok(Self {
            data,
            levels,
            height,
            width,
        })
    }

    /// Accept a (time, level, lat, lon) array as read from model output.
    ///
    /// The time dimension must be exactly 1.
    pub fn from_snapshot(data: Vec<f32>, shape: [usize; 4]) -> Result<Self> {
        let [time, levels, height, width] = shape;
        if time != 1 {
            return Err(RegridError::MultipleSnapshots(time));
        }
        Self::new(data, levels, height, width)
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of cells in one level.
    pub fn plane_len(&self) -> usize {
        self.height * self.width
    }

    /// Archive shape (time = 1, level, lat, lon).
    pub fn shape(&self) -> [usize; 4] {
        [1, self.levels, self.height, self.width]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    /// Values of one level, row-major.
    pub fn level(&self, level: usize) -> &[f32] {
        let plane = self.plane_len();
        &self.data[level * plane..(level + 1) * plane]
    }

    pub fn get(&self, level: usize, row: usize, col: usize) -> Option<f32> {
        if level >= self.levels || row >= self.height || col >= self.width {
            return None;
        }
        self.data
            .get(level * self.plane_len() + row * self.width + col)
            .copied()
    }

    /// Vertical profile of the cell at (row, col), level 0 first.
    pub fn column(&self, row: usize, col: usize) -> Vec<f32> {
        if row >= self.height || col >= self.width {
            return Vec::new();
        }
        let plane = self.plane_len();
        let cell = row * self.width + col;
        (0..self.levels).map(|k| self.data[k * plane + cell]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field2d_get() {
        let data: Vec<f32> = (0..6).map(|i| i as f32).collect();
        let field = Field2D::new(data, 3, 2).unwrap();
        assert_eq!(field.shape(), (2, 3));
        assert_eq!(field.get(0, 0), Some(0.0));
        assert_eq!(field.get(1, 2), Some(5.0));
        assert_eq!(field.get(2, 0), None);
        assert_eq!(field.get(0, 3), None);
    }

    #[test]
    fn test_field2d_rejects_wrong_length() {
        assert!(matches!(
            Field2D::new(vec![0.0; 5], 3, 2),
            Err(RegridError::ShapeMismatch {
                expected: 6,
                actual: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_field3d_levels_and_columns() {
        // 2 levels of a 1x2 grid
        let field = Field3D::new(vec![1.0, 2.0, 3.0, 4.0], 2, 1, 2).unwrap();
        assert_eq!(field.shape(), [1, 2, 1, 2]);
        assert_eq!(field.level(1), &[3.0, 4.0]);
        assert_eq!(field.column(0, 1), vec![2.0, 4.0]);
        assert_eq!(field.get(1, 0, 0), Some(3.0));
        assert!(field.column(1, 0).is_empty());
    }

    #[test]
    fn test_from_snapshot_requires_single_time() {
        assert!(Field3D::from_snapshot(vec![0.0; 4], [1, 2, 1, 2]).is_ok());
        assert!(matches!(
            Field3D::from_snapshot(vec![0.0; 8], [2, 2, 1, 2]),
            Err(RegridError::MultipleSnapshots(2))
        ));
        assert!(Field3D::new(vec![], 0, 1, 1).is_err());
    }
}
