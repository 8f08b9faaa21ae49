//! Scenario execution engine.

use std::time::Instant;

use regrid_common::{is_sentinel, SENTINEL};
use regrid_engine::{Field2D, Field3D, HorizontalRegridder, VerticalProfileResampler};
use serde::{Deserialize, Serialize};
use test_utils::{
    create_island_mask, create_sigma_levels, create_sloping_bathymetry, create_stratified_field,
    create_test_grid,
};
use tracing::{debug, info};

use crate::config::ScenarioConfig;

/// Timings and coverage statistics of one scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResults {
    pub config_name: String,
    pub source_shape: (usize, usize),
    pub destination_shape: (usize, usize),
    pub native_levels: usize,
    pub depth_levels: usize,
    pub iterations: usize,

    /// Milliseconds to build the nearest-point lookup.
    pub lookup_ms: f64,
    /// Milliseconds to build the vertical resampler (mask and bathymetry).
    pub resampler_ms: f64,
    /// Mean milliseconds per 2D horizontal regrid.
    pub horizontal_ms: f64,
    /// Mean milliseconds per iteration for the tracer and velocity resamples.
    pub vertical_ms: f64,
    /// Mean milliseconds for bottom, surface and column products.
    pub extraction_ms: f64,

    pub water_cells: usize,
    pub land_cells: usize,
    /// Mean number of filled depth levels per water cell.
    pub mean_resolved_levels: f64,
    pub max_resolved_levels: usize,
    /// Fraction of the resampled volume that is the sentinel.
    pub sentinel_fraction: f64,
    pub mean_surface: Option<f64>,
    /// Mean velocity surface value, scaled by `velocity_surface_factor`.
    pub mean_velocity_surface: Option<f64>,
    pub mean_bottom: Option<f64>,
    /// (depth limit, mean column sum over water cells)
    pub column_sums: Vec<(f32, Option<f64>)>,
}

/// Runs one scenario through the engine.
pub struct ScenarioRunner {
    config: ScenarioConfig,
}

impl ScenarioRunner {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    /// Run inside a thread pool sized by the scenario's `regrid.threads`.
    pub fn run(&self) -> anyhow::Result<ScenarioResults> {
        let pool = self.config.regrid.thread_pool()?;
        pool.install(|| self.run_inner())
    }

    fn run_inner(&self) -> anyhow::Result<ScenarioResults> {
        let config = &self.config;
        let source = config.source.build()?;
        let dest = config.destination.build(&source)?;
        let depths = config.regrid.depth_table()?;
        let (sny, snx) = source.shape();

        info!(
            scenario = %config.name,
            source_cells = source.len(),
            destination_cells = dest.len(),
            "Running scenario"
        );

        let start = Instant::now();
        let horizontal = HorizontalRegridder::new(&source, &dest)?;
        let lookup_ms = elapsed_ms(start);

        let sigma = create_sigma_levels(config.levels);
        let mask = create_island_mask(snx, sny, config.island_radius);
        let (shallow, deep) = config.bathymetry;
        let bathymetry = create_sloping_bathymetry(snx, sny, shallow, deep);

        let start = Instant::now();
        let vertical =
            VerticalProfileResampler::new(&horizontal, &sigma, &mask, &bathymetry, depths.clone())?;
        let resampler_ms = elapsed_ms(start);

        let (surface_value, bottom_value) = config.profile;
        let layered = Field3D::new(
            create_stratified_field(&sigma, snx, sny, surface_value, bottom_value),
            config.levels,
            sny,
            snx,
        )?;
        let (velocity_top, velocity_bottom) = config.velocity_profile;
        let velocity = Field3D::new(
            create_stratified_field(&sigma, snx, sny, velocity_top, velocity_bottom),
            config.levels,
            sny,
            snx,
        )?;
        let flat = create_test_grid(snx, sny);

        let mut horizontal_total = 0.0;
        let mut vertical_total = 0.0;
        let mut extraction_total = 0.0;
        let mut last = None;

        for iteration in 0..config.iterations {
            let start = Instant::now();
            horizontal.interp(&flat)?;
            horizontal_total += elapsed_ms(start);

            let start = Instant::now();
            let cube = vertical.interp(&layered)?;
            let velocity_cube = vertical.interp(&velocity)?;
            vertical_total += elapsed_ms(start);

            let start = Instant::now();
            let surface = vertical.surface_values(&cube, config.regrid.surface_factor);
            let velocity_surface =
                vertical.surface_values(&velocity_cube, config.regrid.velocity_surface_factor);
            let bottom = vertical.bottom_values(&cube);
            let sums = vertical.column_sums(&cube, &config.regrid.column_limits)?;
            extraction_total += elapsed_ms(start);

            debug!(iteration, "Scenario iteration complete");
            last = Some((cube, surface, velocity_surface, bottom, sums));
        }

        let Some((cube, surface, velocity_surface, bottom, sums)) = last else {
            anyhow::bail!("scenario ran no iterations");
        };

        let n = config.iterations as f64;
        let water = vertical.water_mask().water_indices();
        let (mean_resolved_levels, max_resolved_levels) = resolved_levels(&cube, water);

        Ok(ScenarioResults {
            config_name: config.name.clone(),
            source_shape: (sny, snx),
            destination_shape: dest.shape(),
            native_levels: config.levels,
            depth_levels: depths.len(),
            iterations: config.iterations,
            lookup_ms,
            resampler_ms,
            horizontal_ms: horizontal_total / n,
            vertical_ms: vertical_total / n,
            extraction_ms: extraction_total / n,
            water_cells: water.len(),
            land_cells: dest.len() - water.len(),
            mean_resolved_levels,
            max_resolved_levels,
            sentinel_fraction: sentinel_fraction(cube.data()),
            mean_surface: mean_valid(&surface),
            mean_velocity_surface: mean_valid(&velocity_surface),
            mean_bottom: mean_valid(&bottom),
            column_sums: config
                .regrid
                .column_limits
                .iter()
                .copied()
                .zip(sums.iter().map(mean_valid))
                .collect(),
        })
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Mean and max count of non-sentinel levels over the given cells.
fn resolved_levels(cube: &Field3D, cells: &[usize]) -> (f64, usize) {
    if cells.is_empty() {
        return (0.0, 0);
    }
    let plane = cube.plane_len();
    let counts = cells.iter().map(|&cell| {
        (0..cube.levels())
            .filter(|&level| !is_sentinel(cube.data()[level * plane + cell]))
            .count()
    });
    let (total, max) = counts.fold((0, 0), |(total, max), c| (total + c, max.max(c)));
    (total as f64 / cells.len() as f64, max)
}

fn sentinel_fraction(values: &[f32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|&&v| v == SENTINEL).count() as f64 / values.len() as f64
}

/// Mean of the non-sentinel values, if any.
fn mean_valid(field: &Field2D) -> Option<f64> {
    let (sum, count) = field
        .data()
        .iter()
        .filter(|&&v| !is_sentinel(v))
        .fold((0.0, 0usize), |(sum, count), &v| (sum + v as f64, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_quick_scenario_runs() {
        let mut config = ScenarioConfig::quick(30, 20, 6);
        config.iterations = 2;
        let results = ScenarioRunner::new(config).run().unwrap();

        assert_eq!(results.source_shape, (20, 30));
        assert_eq!(results.depth_levels, 136);
        assert!(results.water_cells > 0);
        assert!(results.land_cells > 0);
        assert!(results.max_resolved_levels > 0);
        assert!(results.sentinel_fraction > 0.0 && results.sentinel_fraction < 1.0);
        assert_eq!(results.column_sums.len(), 2);
    }

    #[test]
    fn test_velocity_surface_uses_velocity_factor() {
        // Uniform profiles: every resolved surface value is the profile
        // value times the matching factor.
        let mut config = ScenarioConfig::quick(24, 16, 4);
        config.profile = (10.0, 10.0);
        config.velocity_profile = (0.5, 0.5);
        config.regrid.surface_factor = 1.0;
        config.regrid.velocity_surface_factor = 1.2;
        let results = ScenarioRunner::new(config).run().unwrap();

        assert_approx_eq!(results.mean_surface.unwrap(), 10.0, 1e-5);
        assert_approx_eq!(results.mean_velocity_surface.unwrap(), 0.6, 1e-5);
    }

    #[test]
    fn test_resolved_levels() {
        let cube = Field3D::new(vec![1.0, 1.0, 2.0, SENTINEL], 2, 1, 2).unwrap();
        let (mean, max) = resolved_levels(&cube, &[0, 1]);
        assert_approx_eq!(mean, 1.5, 1e-12);
        assert_eq!(max, 2);
    }

    #[test]
    fn test_mean_valid_skips_sentinel() {
        let field = Field2D::new(vec![2.0, SENTINEL, 4.0], 3, 1).unwrap();
        assert_eq!(mean_valid(&field), Some(3.0));
    }
}
