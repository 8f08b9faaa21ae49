//! Nearest-point horizontal regridding from scattered source cells onto a
//! regular lon/lat raster.
//!
//! The nearest source cell of every destination point depends only on the
//! two grids, so it is resolved once when the regridder is built and
//! stored as a lookup table. Interpolating a field, or one vertical level
//! of a layered field, is then a gather over that table.
//!
//! Distances are plain Euclidean distances in lon/lat degrees, not
//! geodesic distances. That is adequate for regional grids and degrades
//! near the poles or across the antimeridian.

use std::sync::Arc;
use std::time::Instant;

use kd_tree::KdTree2;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use regrid_common::sentinel::{restamp, to_nan};
use regrid_common::{DestinationGrid, SourceGrid, SENTINEL};
use tracing::{debug, info};

use crate::error::{RegridError, Result};
use crate::field::Field2D;

/// Marks a destination cell with no resolvable source cell.
const NO_SOURCE: usize = usize::MAX;

/// Maps fields aligned with a source grid onto a destination raster.
///
/// Cloning is cheap: the lookup table and destination grid are shared.
#[derive(Debug, Clone)]
pub struct HorizontalRegridder {
    source_shape: (usize, usize),
    destination: Arc<DestinationGrid>,
    nearest: Arc<[usize]>,
}

impl HorizontalRegridder {
    /// Resolve the nearest source cell of every destination point.
    ///
    /// Source cells with non-finite coordinates are never selected. Fails
    /// only if no source cell has finite coordinates.
    pub fn new(source: &SourceGrid, destination: &DestinationGrid) -> Result<Self> {
        let start = Instant::now();

        let points: Vec<(usize, [f64; 2])> = source
            .lons()
            .iter()
            .zip(source.lats())
            .enumerate()
            .filter(|(_, (lon, lat))| lon.is_finite() && lat.is_finite())
            .map(|(i, (&lon, &lat))| (i, [lon, lat]))
            .collect();
        if points.is_empty() {
            return Err(RegridError::NoSourcePoints);
        }
        let usable = points.len();

        let tree = KdTree2::build_by_key(points, |item, k| OrderedFloat(item.1[k]));

        let nx = destination.nx();
        let mut nearest = vec![NO_SOURCE; destination.len()];
        nearest
            .par_chunks_mut(nx)
            .zip(destination.lats().par_iter())
            .for_each(|(row, &lat)| {
                for (slot, &lon) in row.iter_mut().zip(destination.lons()) {
                    if let Some(found) = tree.nearest_by(&[lon, lat], |item, k| item.1[k]) {
                        *slot = found.item.0;
                    }
                }
            });

        info!(
            source_rows = source.ny(),
            source_cols = source.nx(),
            usable_source_points = usable,
            dest_rows = destination.ny(),
            dest_cols = destination.nx(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Built nearest-point lookup"
        );

        Ok(Self {
            source_shape: source.shape(),
            destination: Arc::new(destination.clone()),
            nearest: nearest.into(),
        })
    }

    /// Regrid a field using the sentinel both as the missing marker and as
    /// the fill value.
    ///
    /// Every output cell holds either a real source value or the sentinel.
    pub fn interp(&self, field: &[f32]) -> Result<Field2D> {
        self.interp_with(field, Some(SENTINEL), SENTINEL)
    }

    /// Regrid a field with an explicit missing marker and fill value.
    ///
    /// Source samples equal to `missing` (and NaN samples) are treated as
    /// absent: a destination cell whose nearest source sample is absent
    /// receives `fill`. The nearest sample is chosen purely by distance, so
    /// an absent sample is not replaced by the next-nearest valid one.
    pub fn interp_with(&self, field: &[f32], missing: Option<f32>, fill: f32) -> Result<Field2D> {
        self.check_source_len(field.len())?;

        let start = Instant::now();
        let mut output = vec![fill; self.nearest.len()];
        self.gather(field, missing, fill, &mut output);

        debug!(
            cells = output.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Regridded 2D field"
        );

        let (ny, nx) = self.destination.shape();
        Field2D::new(output, nx, ny)
    }

    /// Fill `out` (one destination plane) from `field` without allocating.
    ///
    /// Callers must have checked `field` against the source shape.
    pub(crate) fn gather(&self, field: &[f32], missing: Option<f32>, fill: f32, out: &mut [f32]) {
        for (dst, &src) in out.iter_mut().zip(self.nearest.iter()) {
            let value = field
                .get(src)
                .map_or(f32::NAN, |&v| to_nan(v, missing));
            *dst = restamp(value, fill);
        }
    }

    pub(crate) fn check_source_len(&self, len: usize) -> Result<()> {
        let expected = self.source_len();
        if len != expected {
            return Err(RegridError::shape_mismatch(
                format!("source field for a {}x{} grid", self.source_shape.0, self.source_shape.1),
                expected,
                len,
            ));
        }
        Ok(())
    }

    /// Flat index of the source cell feeding destination cell (row, col).
    pub fn nearest_source(&self, row: usize, col: usize) -> Option<usize> {
        let (ny, nx) = self.destination.shape();
        if row >= ny || col >= nx {
            return None;
        }
        Some(self.nearest[row * nx + col]).filter(|&i| i != NO_SOURCE)
    }

    pub fn destination(&self) -> &DestinationGrid {
        &self.destination
    }

    /// Source shape as (rows, columns).
    pub fn source_shape(&self) -> (usize, usize) {
        self.source_shape
    }

    pub fn source_len(&self) -> usize {
        self.source_shape.0 * self.source_shape.1
    }

    /// Number of cells in one destination plane.
    pub fn destination_len(&self) -> usize {
        self.nearest.len()
    }
}
