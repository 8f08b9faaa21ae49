//! Source and destination grid geometry.
//!
//! Source grids are arbitrary 2D coordinate arrays (curvilinear model
//! grids, or the outer product of two 1D axes). Destination grids are
//! always regular rasters described by two strictly increasing axes.

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::error::{GridError, GridResult};

/// Equatorial earth radius in meters, spherical approximation.
const EARTH_RADIUS_M: f64 = 6378137.0;

/// Coordinates of every source cell, row-major (`ny` rows of `nx` cells).
///
/// Non-finite coordinates are allowed and mark cells that can never be
/// chosen as a nearest sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSourceGrid")]
pub struct SourceGrid {
    lons: Vec<f64>,
    lats: Vec<f64>,
    nx: usize,
    ny: usize,
}

impl SourceGrid {
    /// Build a curvilinear grid from flattened 2D coordinate arrays.
    pub fn curvilinear(lons: Vec<f64>, lats: Vec<f64>, ny: usize, nx: usize) -> GridResult<Self> {
        if nx == 0 || ny == 0 {
            return Err(GridError::Empty("source grid"));
        }
        if lons.len() != nx * ny || lats.len() != nx * ny {
            return Err(GridError::ShapeMismatch {
                lons: lons.len(),
                lats: lats.len(),
                ny,
                nx,
            });
        }
        Ok(Self { lons, lats, nx, ny })
    }

    /// Build a grid as the outer product of 1D longitude and latitude axes.
    pub fn from_axes(lon_axis: &[f64], lat_axis: &[f64]) -> GridResult<Self> {
        let nx = lon_axis.len();
        let ny = lat_axis.len();
        let mut lons = Vec::with_capacity(nx * ny);
        let mut lats = Vec::with_capacity(nx * ny);
        for &lat in lat_axis {
            lons.extend_from_slice(lon_axis);
            lats.extend(std::iter::repeat(lat).take(nx));
        }
        Self::curvilinear(lons, lats, ny, nx)
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Shape as (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    /// Total number of source cells.
    pub fn len(&self) -> usize {
        self.nx * self.ny
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bounding box of all finite source coordinates.
    pub fn bbox(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(&self.lons, &self.lats)
    }

    /// Largest lon/lat box whose edges lie inside the curvilinear grid.
    ///
    /// Assumes row 0 is the southern edge and column 0 the western edge.
    /// The south bound is the highest latitude along the first row, the
    /// north bound the lowest along the last row, and likewise for the
    /// western and eastern columns. Fails if the grid is so distorted that
    /// the resulting box is inverted.
    pub fn inner_bbox(&self) -> GridResult<BoundingBox> {
        let (nx, ny) = (self.nx, self.ny);
        let at = |values: &[f64], row: usize, col: usize| values[row * nx + col];

        let min_lat = (0..nx)
            .map(|c| at(&self.lats, 0, c))
            .fold(f64::NAN, f64::max);
        let max_lat = (0..nx)
            .map(|c| at(&self.lats, ny - 1, c))
            .fold(f64::NAN, f64::min);
        let min_lon = (0..ny)
            .map(|r| at(&self.lons, r, 0))
            .fold(f64::NAN, f64::max);
        let max_lon = (0..ny)
            .map(|r| at(&self.lons, r, nx - 1))
            .fold(f64::NAN, f64::min);

        let bbox = BoundingBox::new(min_lon, min_lat, max_lon, max_lat);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Spacing of the first cell as (dlon, dlat).
    ///
    /// Meaningful for grids built from 1D axes; on curvilinear grids it is
    /// only the local spacing at the origin corner.
    pub fn axis_spacing(&self) -> GridResult<(f64, f64)> {
        if self.nx < 2 || self.ny < 2 {
            return Err(GridError::InvalidSpacing(format!(
                "need at least 2x2 cells, grid is {}x{}",
                self.ny, self.nx
            )));
        }
        let dlon = self.lons[1] - self.lons[0];
        let dlat = self.lats[self.nx] - self.lats[0];
        if !dlon.is_finite() || !dlat.is_finite() {
            return Err(GridError::InvalidSpacing(
                "origin corner has non-finite coordinates".to_string(),
            ));
        }
        Ok((dlon, dlat))
    }
}

/// A regular lon/lat raster.
///
/// Output arrays on this grid are row-major with shape
/// (`lats.len()`, `lons.len()`): row index follows latitude, column
/// index follows longitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDestinationGrid")]
pub struct DestinationGrid {
    lons: Vec<f64>,
    lats: Vec<f64>,
}

impl DestinationGrid {
    /// Build a raster from two strictly increasing axes.
    pub fn new(lons: Vec<f64>, lats: Vec<f64>) -> GridResult<Self> {
        check_axis("destination longitude", &lons)?;
        check_axis("destination latitude", &lats)?;
        Ok(Self { lons, lats })
    }

    /// Evenly spaced axes spanning `bbox`, both endpoints included.
    pub fn spanning(bbox: &BoundingBox, nx: usize, ny: usize) -> GridResult<Self> {
        bbox.validate()?;
        Self::new(
            linspace(bbox.min_lon, bbox.max_lon, nx),
            linspace(bbox.min_lat, bbox.max_lat, ny),
        )
    }

    /// Axes starting at the south-west corner with fixed steps.
    ///
    /// The upper bound is exclusive, so a box of width `w` yields
    /// `ceil(w / dlon)` longitudes.
    pub fn with_spacing(bbox: &BoundingBox, dlon: f64, dlat: f64) -> GridResult<Self> {
        bbox.validate()?;
        Self::new(
            arange(bbox.min_lon, bbox.max_lon, dlon)?,
            arange(bbox.min_lat, bbox.max_lat, dlat)?,
        )
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn nx(&self) -> usize {
        self.lons.len()
    }

    pub fn ny(&self) -> usize {
        self.lats.len()
    }

    /// Shape as (rows, columns) = (latitudes, longitudes).
    pub fn shape(&self) -> (usize, usize) {
        (self.ny(), self.nx())
    }

    /// Total number of destination cells.
    pub fn len(&self) -> usize {
        self.nx() * self.ny()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coordinates of the cell at (row, col) as (lon, lat).
    pub fn point(&self, row: usize, col: usize) -> Option<(f64, f64)> {
        Some((*self.lons.get(col)?, *self.lats.get(row)?))
    }

    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.lons[0],
            self.lats[0],
            self.lons[self.nx() - 1],
            self.lats[self.ny() - 1],
        )
    }
}

/// Degree spacing equivalent to half a model's metric grid spacing.
///
/// `dx_m` and `dy_m` are the model's east/north spacing in meters and
/// `center_lat` the latitude where the conversion is evaluated. Returns
/// (dlon, dlat) in degrees on a spherical earth.
pub fn metric_spacing(dx_m: f64, dy_m: f64, center_lat: f64) -> GridResult<(f64, f64)> {
    if !(dx_m > 0.0 && dy_m > 0.0) || !dx_m.is_finite() || !dy_m.is_finite() {
        return Err(GridError::InvalidSpacing(format!(
            "metric spacing must be positive, got dx={} dy={}",
            dx_m, dy_m
        )));
    }
    if !center_lat.is_finite() || center_lat.abs() >= 90.0 {
        return Err(GridError::InvalidSpacing(format!(
            "center latitude {} is outside (-90, 90)",
            center_lat
        )));
    }
    let dlat = 0.5 * (dy_m / EARTH_RADIUS_M).to_degrees();
    let dlon = 0.5 * (dx_m / (EARTH_RADIUS_M * center_lat.to_radians().cos())).to_degrees();
    Ok((dlon, dlat))
}

#[derive(Deserialize)]
struct RawSourceGrid {
    lons: Vec<f64>,
    lats: Vec<f64>,
    nx: usize,
    ny: usize,
}

impl TryFrom<RawSourceGrid> for SourceGrid {
    type Error = GridError;

    fn try_from(raw: RawSourceGrid) -> GridResult<Self> {
        Self::curvilinear(raw.lons, raw.lats, raw.ny, raw.nx)
    }
}

#[derive(Deserialize)]
struct RawDestinationGrid {
    lons: Vec<f64>,
    lats: Vec<f64>,
}

impl TryFrom<RawDestinationGrid> for DestinationGrid {
    type Error = GridError;

    fn try_from(raw: RawDestinationGrid) -> GridResult<Self> {
        Self::new(raw.lons, raw.lats)
    }
}

fn check_axis(axis: &'static str, values: &[f64]) -> GridResult<()> {
    if values.is_empty() {
        return Err(GridError::Empty(axis));
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(GridError::NonFinite { axis, index });
    }
    for (index, pair) in values.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(GridError::NotIncreasing {
                axis,
                index: index + 1,
                previous: pair[0],
                value: pair[1],
            });
        }
    }
    Ok(())
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

fn arange(start: f64, end: f64, step: f64) -> GridResult<Vec<f64>> {
    if !(step > 0.0) || !step.is_finite() {
        return Err(GridError::InvalidSpacing(format!(
            "step must be positive, got {}",
            step
        )));
    }
    let n = ((end - start) / step).ceil().max(0.0) as usize;
    Ok((0..n).map(|i| start + i as f64 * step).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_axes_is_row_major() {
        let grid = SourceGrid::from_axes(&[0.0, 1.0, 2.0], &[10.0, 11.0]).unwrap();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.lons(), &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert_eq!(grid.lats(), &[10.0, 10.0, 10.0, 11.0, 11.0, 11.0]);
    }

    #[test]
    fn test_curvilinear_shape_mismatch() {
        let err = SourceGrid::curvilinear(vec![0.0; 6], vec![0.0; 5], 2, 3).unwrap_err();
        assert!(matches!(err, GridError::ShapeMismatch { lons: 6, lats: 5, .. }));
    }

    #[test]
    fn test_destination_rejects_non_increasing() {
        let err = DestinationGrid::new(vec![0.0, 1.0, 1.0], vec![0.0]).unwrap_err();
        assert!(matches!(
            err,
            GridError::NotIncreasing {
                axis: "destination longitude",
                index: 2,
                ..
            }
        ));
        assert!(DestinationGrid::new(vec![0.0], vec![]).is_err());
        assert!(DestinationGrid::new(vec![0.0, f64::NAN], vec![0.0]).is_err());
    }

    #[test]
    fn test_spanning_includes_endpoints() {
        let bbox = BoundingBox::new(10.0, 40.0, 12.0, 41.0);
        let grid = DestinationGrid::spanning(&bbox, 5, 3).unwrap();
        assert_eq!(grid.lons(), &[10.0, 10.5, 11.0, 11.5, 12.0]);
        assert_eq!(grid.lats(), &[40.0, 40.5, 41.0]);
        assert_eq!(grid.bbox(), bbox);
    }

    #[test]
    fn test_with_spacing_excludes_end() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 0.5);
        let grid = DestinationGrid::with_spacing(&bbox, 0.25, 0.25).unwrap();
        assert_eq!(grid.lons(), &[0.0, 0.25, 0.5, 0.75]);
        assert_eq!(grid.lats(), &[0.0, 0.25]);
        assert!(DestinationGrid::with_spacing(&bbox, 0.0, 0.25).is_err());
    }

    #[test]
    fn test_inner_bbox_of_rotated_grid() {
        // Slightly sheared grid: each row shifts east by 0.1 degrees.
        let mut lons = Vec::new();
        let mut lats = Vec::new();
        for row in 0..3 {
            for col in 0..4 {
                lons.push(col as f64 + 0.1 * row as f64);
                lats.push(row as f64 + 0.05 * col as f64);
            }
        }
        let grid = SourceGrid::curvilinear(lons, lats, 3, 4).unwrap();
        let inner = grid.inner_bbox().unwrap();
        assert!((inner.min_lon - 0.2).abs() < 1e-12);
        assert!((inner.max_lon - 3.0).abs() < 1e-12);
        assert!((inner.min_lat - 0.15).abs() < 1e-12);
        assert!((inner.max_lat - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_axis_spacing() {
        let grid = SourceGrid::from_axes(&[0.0, 0.5, 1.0], &[10.0, 10.25]).unwrap();
        assert_eq!(grid.axis_spacing().unwrap(), (0.5, 0.25));
        let single = SourceGrid::from_axes(&[0.0], &[0.0]).unwrap();
        assert!(single.axis_spacing().is_err());
    }

    #[test]
    fn test_metric_spacing_at_equator() {
        let (dlon, dlat) = metric_spacing(1000.0, 1000.0, 0.0).unwrap();
        let expected = 0.5 * (1000.0 / EARTH_RADIUS_M).to_degrees();
        assert!((dlat - expected).abs() < 1e-12);
        assert!((dlon - expected).abs() < 1e-12);

        let (dlon_60, _) = metric_spacing(1000.0, 1000.0, 60.0).unwrap();
        assert!((dlon_60 - 2.0 * expected).abs() < 1e-9);
        assert!(metric_spacing(-1.0, 1.0, 0.0).is_err());
        assert!(metric_spacing(1.0, 1.0, 90.0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let dest: DestinationGrid =
            serde_json::from_str(r#"{"lons": [0.0, 1.0], "lats": [5.0]}"#).unwrap();
        assert_eq!(dest.shape(), (1, 2));
        assert!(serde_json::from_str::<DestinationGrid>(r#"{"lons": [1.0, 0.0], "lats": [5.0]}"#).is_err());
        assert!(serde_json::from_str::<SourceGrid>(
            r#"{"lons": [0.0], "lats": [0.0, 1.0], "nx": 1, "ny": 1}"#
        )
        .is_err());
    }
}
