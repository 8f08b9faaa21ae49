//! Sigma-level to fixed-depth resampling of layered ocean fields.
//!
//! A resampler is built once per grid pair from the source sigma levels,
//! land/water mask and bathymetry. Construction regrids the mask and the
//! bathymetry onto the destination raster; every later [`interp`] call
//! reuses both.
//!
//! [`interp`]: VerticalProfileResampler::interp

use std::time::Instant;

use rayon::prelude::*;
use regrid_common::sentinel::restamp;
use regrid_common::{is_sentinel, DepthTable, SENTINEL};
use tracing::{debug, info, warn};

use crate::column;
use crate::error::{RegridError, Result};
use crate::field::{Field2D, Field3D};
use crate::horizontal::HorizontalRegridder;
use crate::interpolation::linear_interp;
use crate::mask::WaterMask;

/// Resamples layered fields from native sigma levels onto a depth table.
#[derive(Debug, Clone)]
pub struct VerticalProfileResampler {
    horizontal: HorizontalRegridder,
    depths: DepthTable,
    /// Native level index for each working level, shallowest first.
    order: Vec<usize>,
    /// Sigma values in working order (0 at the surface, decreasing).
    sigma: Vec<f64>,
    mask: WaterMask,
    bathymetry: Field2D,
}

impl VerticalProfileResampler {
    /// Build a resampler around an existing horizontal regridder.
    ///
    /// * `sigma` - native level coordinates in `[-1, 0]`, ascending or
    ///   descending, one per native level of the fields to resample
    /// * `mask` - source land/water mask (1 = water, 0 = land)
    /// * `bathymetry` - positive local water depth in meters on the source grid
    /// * `depths` - target depth table
    pub fn new(
        horizontal: &HorizontalRegridder,
        sigma: &[f64],
        mask: &[f32],
        bathymetry: &[f32],
        depths: DepthTable,
    ) -> Result<Self> {
        let order = working_order(sigma)?;
        let sigma: Vec<f64> = order.iter().map(|&k| sigma[k]).collect();

        // Unresolved mask cells must never read as water.
        let mask = WaterMask::from_field(horizontal.interp_with(mask, None, 0.0)?);
        let bathymetry = horizontal.interp(bathymetry)?;

        if mask.water_count() == 0 {
            warn!("Regridded mask has no water cells; every resampled column will be sentinel");
        }
        let unusable = mask
            .water_indices()
            .iter()
            .filter(|&&cell| !usable_depth(bathymetry.data()[cell]))
            .count();
        if unusable > 0 {
            warn!(
                cells = unusable,
                "Water cells without usable bathymetry will stay sentinel"
            );
        }

        info!(
            native_levels = sigma.len(),
            depth_levels = depths.len(),
            water_cells = mask.water_count(),
            total_cells = mask.len(),
            "Built vertical resampler"
        );

        Ok(Self {
            horizontal: horizontal.clone(),
            depths,
            order,
            sigma,
            mask,
            bathymetry,
        })
    }

    /// Resample one snapshot from native levels onto the depth table.
    ///
    /// `field` holds native levels in the same order as the sigma values
    /// passed to [`new`](Self::new), each aligned with the source grid,
    /// with missing samples set to the sentinel. The result has one level
    /// per depth-table entry; land cells and depths below the local bottom
    /// are the sentinel.
    pub fn interp(&self, field: &Field3D) -> Result<Field3D> {
        if field.levels() != self.order.len() {
            return Err(RegridError::shape_mismatch(
                "native levels of layered field",
                self.order.len(),
                field.levels(),
            ));
        }
        self.horizontal.check_source_len(field.plane_len())?;

        let start = Instant::now();
        let (ny, nx) = self.horizontal.destination().shape();
        let plane = ny * nx;
        let native_levels = self.order.len();

        // Horizontal pass, still in sigma space. Unresolved samples stay
        // NaN so the vertical pass can skip them.
        let mut stacked = vec![f32::NAN; native_levels * plane];
        stacked
            .par_chunks_mut(plane)
            .zip(self.order.par_iter())
            .for_each(|(out, &native)| {
                self.horizontal
                    .gather(field.level(native), Some(SENTINEL), f32::NAN, out);
            });
        let horizontal_elapsed = start.elapsed();

        // Vertical pass over water cells, one column per cell.
        let n_depths = self.depths.len();
        let water = self.mask.water_indices();
        let mut columns = vec![SENTINEL; water.len() * n_depths];
        columns
            .par_chunks_mut(n_depths)
            .zip(water.par_iter())
            .for_each_init(
                || {
                    (
                        Vec::<f64>::with_capacity(native_levels),
                        Vec::<f32>::with_capacity(native_levels),
                    )
                },
                |(z, values), (column, &cell)| {
                    self.resample_column(&stacked, plane, cell, z, values, column);
                },
            );

        let mut output = vec![SENTINEL; n_depths * plane];
        for (column, &cell) in columns.chunks_exact(n_depths).zip(water) {
            for (level, &value) in column.iter().enumerate() {
                output[level * plane + cell] = restamp(value, SENTINEL);
            }
        }

        debug!(
            native_levels,
            depth_levels = n_depths,
            water_cells = water.len(),
            horizontal_ms = horizontal_elapsed.as_millis() as u64,
            total_ms = start.elapsed().as_millis() as u64,
            "Resampled layered field"
        );

        Field3D::new(output, n_depths, ny, nx)
    }

    /// Interpolate one water column into `out` (one slot per depth level).
    ///
    /// `z` and `values` are per-worker scratch buffers.
    #[inline]
    fn resample_column(
        &self,
        stacked: &[f32],
        plane: usize,
        cell: usize,
        z: &mut Vec<f64>,
        values: &mut Vec<f32>,
        out: &mut [f32],
    ) {
        let local_depth = self.bathymetry.data()[cell];
        if !usable_depth(local_depth) {
            return;
        }
        let local_depth = local_depth as f64;

        // Missing samples stay in the profile as NaN so that any target
        // bracketed by (or clamped to) one resolves to the sentinel.
        z.clear();
        values.clear();
        let mut bottom = None;
        for (level, &s) in self.sigma.iter().enumerate() {
            let depth = local_depth * -s;
            let value = stacked[level * plane + cell];
            if !value.is_nan() {
                bottom = Some(depth);
            }
            z.push(depth);
            values.push(value);
        }

        let Some(bottom) = bottom else {
            return;
        };
        let resolvable = self.depths.count_within(bottom);
        for (slot, &target) in out[..resolvable].iter_mut().zip(self.depths.levels()) {
            *slot = linear_interp(target as f64, z, values);
        }
    }

    /// Deepest valid value of every column of a resampled volume.
    pub fn bottom_values(&self, cube: &Field3D) -> Field2D {
        column::bottom_values(cube)
    }

    /// Shallowest depth level of a resampled volume, scaled by `factor`.
    pub fn surface_values(&self, cube: &Field3D, factor: f32) -> Field2D {
        column::surface_values(cube, factor)
    }

    /// Column sum down to `depth_limit` using this resampler's mask and table.
    pub fn column_sum(&self, cube: &Field3D, depth_limit: f32) -> Result<Field2D> {
        column::column_sum(cube, depth_limit, &self.mask, &self.depths)
    }

    /// One column sum per depth limit, in the order given.
    pub fn column_sums(&self, cube: &Field3D, depth_limits: &[f32]) -> Result<Vec<Field2D>> {
        depth_limits
            .iter()
            .map(|&limit| self.column_sum(cube, limit))
            .collect()
    }

    pub fn water_mask(&self) -> &WaterMask {
        &self.mask
    }

    /// Local water depth on the destination grid (sentinel where unknown).
    pub fn bathymetry(&self) -> &Field2D {
        &self.bathymetry
    }

    pub fn depths(&self) -> &DepthTable {
        &self.depths
    }

    pub fn horizontal(&self) -> &HorizontalRegridder {
        &self.horizontal
    }

    /// Number of native levels expected by [`interp`](Self::interp).
    pub fn native_levels(&self) -> usize {
        self.order.len()
    }
}

/// Order native levels so that depth increases with working index.
fn working_order(sigma: &[f64]) -> Result<Vec<usize>> {
    if sigma.is_empty() {
        return Err(RegridError::invalid_sigma("no levels"));
    }
    if let Some(k) = sigma
        .iter()
        .position(|s| !s.is_finite() || *s < -1.0 || *s > 0.0)
    {
        return Err(RegridError::invalid_sigma(format!(
            "level {} value {} is outside [-1, 0]",
            k, sigma[k]
        )));
    }

    let ascending = sigma.windows(2).all(|w| w[1] > w[0]);
    let descending = sigma.windows(2).all(|w| w[1] < w[0]);
    let n = sigma.len();
    if descending {
        Ok((0..n).collect())
    } else if ascending {
        Ok((0..n).rev().collect())
    } else {
        Err(RegridError::invalid_sigma(
            "levels must be strictly monotonic",
        ))
    }
}

#[inline]
fn usable_depth(depth: f32) -> bool {
    depth.is_finite() && depth > 0.0 && !is_sentinel(depth)
}
