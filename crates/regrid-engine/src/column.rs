//! Single-level products derived from depth-resampled volumes.
//!
//! All extractors take a volume whose levels are depth-table levels (the
//! output of [`VerticalProfileResampler::interp`]) and return one value
//! per destination cell. A value is valid when it is neither NaN nor the
//! sentinel.
//!
//! [`VerticalProfileResampler::interp`]: crate::VerticalProfileResampler::interp

use rayon::prelude::*;
use regrid_common::{is_sentinel, DepthTable, SENTINEL};

use crate::error::{RegridError, Result};
use crate::field::{Field2D, Field3D};
use crate::mask::WaterMask;

#[inline]
fn is_valid(value: f32) -> bool {
    !value.is_nan() && !is_sentinel(value)
}

/// Deepest valid value of each column, or the sentinel when there is none.
pub fn bottom_values(cube: &Field3D) -> Field2D {
    let plane = cube.plane_len();
    let data = cube.data();
    let levels = cube.levels();

    let output: Vec<f32> = (0..plane)
        .into_par_iter()
        .map(|cell| {
            (0..levels)
                .rev()
                .map(|level| data[level * plane + cell])
                .find(|&v| is_valid(v))
                .unwrap_or(SENTINEL)
        })
        .collect();

    Field2D::from_parts(output, cube.width(), cube.height())
}

/// First depth level of each column multiplied by `factor`.
///
/// No search is done: an invalid first level yields the sentinel.
pub fn surface_values(cube: &Field3D, factor: f32) -> Field2D {
    let output: Vec<f32> = cube
        .level(0)
        .par_iter()
        .map(|&v| if is_valid(v) { v * factor } else { SENTINEL })
        .collect();

    Field2D::from_parts(output, cube.width(), cube.height())
}

/// Sum of each water column over depth levels at or above `depth_limit`.
///
/// Invalid values count as zero. Land cells are the sentinel.
pub fn column_sum(
    cube: &Field3D,
    depth_limit: f32,
    mask: &WaterMask,
    depths: &DepthTable,
) -> Result<Field2D> {
    if cube.levels() != depths.len() {
        return Err(RegridError::shape_mismatch(
            "depth levels of resampled field",
            depths.len(),
            cube.levels(),
        ));
    }
    if mask.len() != cube.plane_len() {
        return Err(RegridError::shape_mismatch(
            "water mask",
            cube.plane_len(),
            mask.len(),
        ));
    }

    let plane = cube.plane_len();
    let data = cube.data();
    let included = depths.count_within(depth_limit as f64);

    let output: Vec<f32> = (0..plane)
        .into_par_iter()
        .map(|cell| {
            if !mask.is_water(cell) {
                return SENTINEL;
            }
            (0..included)
                .map(|level| data[level * plane + cell])
                .filter(|&v| is_valid(v))
                .sum::<f32>()
        })
        .collect();

    Ok(Field2D::from_parts(output, cube.width(), cube.height()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: f32 = SENTINEL;

    #[test]
    fn test_bottom_skips_trailing_sentinels() {
        let cube = Field3D::new(vec![5.0, 3.0, S, S], 4, 1, 1).unwrap();
        assert_eq!(bottom_values(&cube).data(), &[3.0]);
    }

    #[test]
    fn test_surface_is_scaled_first_level() {
        let cube = Field3D::new(vec![5.0, 3.0, S, S], 4, 1, 1).unwrap();
        let surface = surface_values(&cube, 1.2);
        assert!((surface.data()[0] - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_all_sentinel_column() {
        let cube = Field3D::new(vec![S; 3], 3, 1, 1).unwrap();
        assert_eq!(bottom_values(&cube).data(), &[S]);
        assert_eq!(surface_values(&cube, 1.2).data(), &[S]);
    }

    #[test]
    fn test_column_sum_respects_limit() {
        let depths = DepthTable::new(vec![5.0, 10.0, 20.0]).unwrap();
        let mask = WaterMask::from_values(vec![1.0], 1, 1).unwrap();
        let cube = Field3D::new(vec![2.0, 4.0, 8.0], 3, 1, 1).unwrap();

        assert_eq!(column_sum(&cube, 10.0, &mask, &depths).unwrap().data(), &[6.0]);
        assert_eq!(column_sum(&cube, 30.0, &mask, &depths).unwrap().data(), &[14.0]);
        assert_eq!(column_sum(&cube, 1.0, &mask, &depths).unwrap().data(), &[0.0]);
    }

    #[test]
    fn test_column_sum_checks_shapes() {
        let depths = DepthTable::new(vec![5.0, 10.0]).unwrap();
        let mask = WaterMask::from_values(vec![1.0, 0.0], 2, 1).unwrap();
        let cube = Field3D::new(vec![1.0; 3], 3, 1, 1).unwrap();
        assert!(column_sum(&cube, 10.0, &mask, &depths).is_err());

        let cube = Field3D::new(vec![1.0; 2], 2, 1, 1).unwrap();
        assert!(column_sum(&cube, 10.0, &mask, &depths).is_err());
    }
}
