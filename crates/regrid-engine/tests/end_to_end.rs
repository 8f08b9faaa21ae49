//! Full pipeline on a small sheared grid: horizontal regrid, sigma-to-depth
//! resampling and column products.

use regrid_engine::{
    DepthTable, DestinationGrid, Field3D, HorizontalRegridder, SourceGrid,
    VerticalProfileResampler, SENTINEL,
};
use test_utils::{
    assert_all_eq, assert_approx_eq, create_curvilinear_grid, create_test_grid, depths,
};

const S: f32 = SENTINEL;

/// 3x3 source with `lon = col + 0.1 * row`, `lat = row`, sampled onto
/// lons [0, 2] and lats [0, 2]. Source point (0, 0) is land.
fn scenario() -> (HorizontalRegridder, VerticalProfileResampler) {
    let (lons, lats) = create_curvilinear_grid(3, 3, (0.0, 0.0), (1.0, 1.0), 0.1);
    let source = SourceGrid::curvilinear(lons, lats, 3, 3).unwrap();
    let dest = DestinationGrid::new(vec![0.0, 2.0], vec![0.0, 2.0]).unwrap();
    let horizontal = HorizontalRegridder::new(&source, &dest).unwrap();

    let mut mask = vec![1.0; 9];
    mask[0] = 0.0;
    let bathymetry = vec![100.0; 9];

    let vertical = VerticalProfileResampler::new(
        &horizontal,
        &[0.0, -0.5, -1.0],
        &mask,
        &bathymetry,
        DepthTable::new(depths::SHORT.to_vec()).unwrap(),
    )
    .unwrap();

    (horizontal, vertical)
}

/// Same profile [10, 6, 2] (surface first) in every source cell.
fn profile_field() -> Field3D {
    let mut data = Vec::with_capacity(27);
    for value in [10.0, 6.0, 2.0] {
        data.extend(std::iter::repeat(value).take(9));
    }
    Field3D::from_snapshot(data, [1, 3, 3, 3]).unwrap()
}

#[test]
fn test_horizontal_picks_nearest_source_cells() {
    let (horizontal, _) = scenario();
    let zeta = create_test_grid(3, 3);
    let out = horizontal.interp(&zeta).unwrap();

    // (row, col) sources: (0,0), (0,2), (2,0), (2,2)
    assert_eq!(out.data(), &[0.0, 2000.0, 2.0, 2002.0]);
    assert_eq!(horizontal.nearest_source(1, 1), Some(8));
}

#[test]
fn test_water_mask_follows_land_point() {
    let (_, vertical) = scenario();
    let mask = vertical.water_mask();
    assert_eq!(mask.values().data(), &[0.0, 1.0, 1.0, 1.0]);
    assert_eq!(mask.water_count(), 3);
}

#[test]
fn test_profile_resampled_to_depth_table() {
    let (_, vertical) = scenario();
    let cube = vertical.interp(&profile_field()).unwrap();
    assert_eq!(cube.shape(), [1, 3, 2, 2]);

    // Land cell stays sentinel at every depth.
    assert_all_eq!(&cube.column(0, 0), S);

    for (row, col) in [(0, 1), (1, 0), (1, 1)] {
        let column = cube.column(row, col);
        assert_approx_eq!(column[0], 9.2, 1e-5);
        assert_approx_eq!(column[1], 5.2, 1e-5);
        assert_eq!(column[2], S, "200 m is below the 100 m bottom");
    }
}

#[test]
fn test_column_products() {
    let (_, vertical) = scenario();
    let cube = vertical.interp(&profile_field()).unwrap();

    let bottom = vertical.bottom_values(&cube);
    assert_eq!(bottom.get(0, 0), Some(S));
    assert_approx_eq!(bottom.get(1, 1).unwrap(), 5.2, 1e-5);

    let surface = vertical.surface_values(&cube, 1.2);
    assert_eq!(surface.get(0, 0), Some(S));
    assert_approx_eq!(surface.get(0, 1).unwrap(), 9.2 * 1.2, 1e-4);

    let sums = vertical.column_sums(&cube, &[10.0, 60.0]).unwrap();
    assert_eq!(sums.len(), 2);
    assert_eq!(sums[0].get(0, 0), Some(S));
    assert_approx_eq!(sums[0].get(1, 0).unwrap(), 9.2, 1e-5);
    assert_approx_eq!(sums[1].get(1, 0).unwrap(), 14.4, 1e-4);
}

#[test]
fn test_bathymetry_is_regridded() {
    let (_, vertical) = scenario();
    assert_eq!(vertical.bathymetry().data(), &[100.0; 4]);
}

#[test]
fn test_resampling_is_repeatable() {
    let (_, vertical) = scenario();
    let field = profile_field();
    let first = vertical.interp(&field).unwrap();
    let second = vertical.interp(&field).unwrap();
    assert_eq!(first, second);
}
