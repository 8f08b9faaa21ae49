//! Synthetic ocean-model data for tests and benchmarks.
//!
//! Every generator is deterministic. 2D outputs are row-major with row 0
//! at the southern edge; layered outputs are level-major.

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// This makes it easy to verify which source cell a regridded value came
/// from by checking that grid[row][col] == col * 1000 + row.
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0.0);   // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[10], 1.0);  // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates a sheared curvilinear grid, returned as flattened (lons, lats).
///
/// Point (row, col) sits at
/// `lon = lon0 + col * dlon + row * shear`, `lat = lat0 + row * dlat`,
/// so every row is tilted eastward by `shear` degrees per row.
///
/// # Example
///
/// ```
/// use test_utils::create_curvilinear_grid;
///
/// let (lons, lats) = create_curvilinear_grid(3, 3, (0.0, 0.0), (1.0, 1.0), 0.1);
/// assert_eq!(lons[3], 0.1); // row 1, col 0
/// assert_eq!(lats[3], 1.0);
/// ```
pub fn create_curvilinear_grid(
    width: usize,
    height: usize,
    origin: (f64, f64),
    spacing: (f64, f64),
    shear: f64,
) -> (Vec<f64>, Vec<f64>) {
    let (lon0, lat0) = origin;
    let (dlon, dlat) = spacing;
    let mut lons = Vec::with_capacity(width * height);
    let mut lats = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            lons.push(lon0 + col as f64 * dlon + row as f64 * shear);
            lats.push(lat0 + row as f64 * dlat);
        }
    }
    (lons, lats)
}

/// Creates evenly spaced values from `start`, `count` of them.
pub fn create_axis(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + i as f64 * step).collect()
}

/// ROMS-style sigma values at layer centers, bottom first.
///
/// Level k is `-1 + (k + 0.5) / n`, so values increase from near -1 to
/// near 0.
pub fn create_sigma_levels(n: usize) -> Vec<f64> {
    (0..n).map(|k| -1.0 + (k as f64 + 0.5) / n as f64).collect()
}

/// Creates a layered field that varies linearly with sigma.
///
/// The value on level k is `surface + (bottom - surface) * -sigma[k]`,
/// the same in every cell. After resampling to depth `d` in a cell of
/// depth `h` the expected value is `surface + (bottom - surface) * d / h`
/// inside the sampled range.
pub fn create_stratified_field(
    sigma: &[f64],
    width: usize,
    height: usize,
    surface: f32,
    bottom: f32,
) -> Vec<f32> {
    let plane = width * height;
    let mut data = Vec::with_capacity(sigma.len() * plane);
    for &s in sigma {
        let value = surface + (bottom - surface) * (-s) as f32;
        data.extend(std::iter::repeat(value).take(plane));
    }
    data
}

/// Creates a 0/1 mask with a circular island of land in the middle.
///
/// Cells within `radius` cells of the grid center are land (0), the rest
/// water (1).
pub fn create_island_mask(width: usize, height: usize, radius: f64) -> Vec<f32> {
    let center_x = (width as f64 - 1.0) / 2.0;
    let center_y = (height as f64 - 1.0) / 2.0;
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let dx = col as f64 - center_x;
            let dy = row as f64 - center_y;
            let land = (dx * dx + dy * dy).sqrt() <= radius;
            data.push(if land { 0.0 } else { 1.0 });
        }
    }
    data
}

/// Creates a bathymetry that deepens linearly from west to east.
///
/// Column 0 has depth `shallow`, the last column `deep`.
pub fn create_sloping_bathymetry(width: usize, height: usize, shallow: f32, deep: f32) -> Vec<f32> {
    let span = (width.max(2) - 1) as f32;
    let mut data = Vec::with_capacity(width * height);
    for _row in 0..height {
        for col in 0..width {
            data.push(shallow + (deep - shallow) * col as f32 / span);
        }
    }
    data
}

/// Creates a grid with missing values at regular intervals.
///
/// Every `missing_interval`-th value (starting from index 0) is replaced
/// with `missing`; the rest come from [`create_test_grid`].
pub fn create_grid_with_missing(
    width: usize,
    height: usize,
    missing_interval: usize,
    missing: f32,
) -> Vec<f32> {
    let mut data = create_test_grid(width, height);
    if missing_interval > 0 {
        for value in data.iter_mut().step_by(missing_interval) {
            *value = missing;
        }
    }
    data
}
