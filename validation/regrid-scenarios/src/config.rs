//! Scenario configuration loading and management.

use regrid_common::{metric_spacing, DestinationGrid, SourceGrid};
use regrid_engine::RegridConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use test_utils::create_curvilinear_grid;

/// Main scenario configuration loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub description: String,
    pub source: SourceSpec,
    pub destination: DestinationSpec,
    /// Native sigma levels of the layered field.
    pub levels: usize,
    /// Radius (in source cells) of the central island; 0 for open water.
    #[serde(default)]
    pub island_radius: f64,
    /// Bathymetry from the western to the eastern edge, meters.
    pub bathymetry: (f32, f32),
    /// Profile value at the surface and at the bottom.
    #[serde(default = "default_profile")]
    pub profile: (f32, f32),
    /// Velocity component at the surface and at the bottom.
    #[serde(default = "default_velocity_profile")]
    pub velocity_profile: (f32, f32),
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default)]
    pub regrid: RegridConfig,
}

fn default_profile() -> (f32, f32) {
    (18.0, 13.0)
}

fn default_velocity_profile() -> (f32, f32) {
    (0.4, 0.05)
}

fn default_iterations() -> usize {
    1
}

/// Synthetic curvilinear source grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub width: usize,
    pub height: usize,
    /// South-west corner (lon, lat).
    pub origin: (f64, f64),
    /// Cell spacing (dlon, dlat) in degrees.
    pub spacing: (f64, f64),
    /// Eastward tilt per row, degrees.
    #[serde(default)]
    pub shear: f64,
}

/// How the destination raster is derived from the source grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DestinationSpec {
    /// `nx` x `ny` points spanning the source interior, endpoints included.
    Spanning { nx: usize, ny: usize },
    /// Source axis spacing times `factor`, over the source interior.
    Scaled { factor: f64 },
    /// Half of a metric model spacing, over the source interior.
    Metric { dx_m: f64, dy_m: f64 },
}

impl SourceSpec {
    pub fn build(&self) -> anyhow::Result<SourceGrid> {
        let (lons, lats) =
            create_curvilinear_grid(self.width, self.height, self.origin, self.spacing, self.shear);
        Ok(SourceGrid::curvilinear(lons, lats, self.height, self.width)?)
    }
}

impl DestinationSpec {
    pub fn build(&self, source: &SourceGrid) -> anyhow::Result<DestinationGrid> {
        let bbox = source.inner_bbox()?;
        let grid = match *self {
            Self::Spanning { nx, ny } => DestinationGrid::spanning(&bbox, nx, ny)?,
            Self::Scaled { factor } => {
                let (dlon, dlat) = source.axis_spacing()?;
                DestinationGrid::with_spacing(&bbox, dlon * factor, dlat * factor)?
            }
            Self::Metric { dx_m, dy_m } => {
                let (dlon, dlat) = metric_spacing(dx_m, dy_m, bbox.center().1)?;
                DestinationGrid::with_spacing(&bbox, dlon, dlat)?
            }
        };
        Ok(grid)
    }
}

impl ScenarioConfig {
    /// Load configuration from YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ScenarioConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// A small open-water scenario for smoke runs.
    pub fn quick(width: usize, height: usize, levels: usize) -> Self {
        Self {
            name: "quick".to_string(),
            description: "Quick smoke scenario".to_string(),
            source: SourceSpec {
                width,
                height,
                origin: (13.0, 44.0),
                spacing: (0.01, 0.01),
                shear: 0.001,
            },
            destination: DestinationSpec::Scaled { factor: 0.75 },
            levels,
            island_radius: height as f64 / 5.0,
            bathymetry: (15.0, 1200.0),
            profile: default_profile(),
            velocity_profile: default_velocity_profile(),
            iterations: 1,
            regrid: RegridConfig::default(),
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.source.width < 2 || self.source.height < 2 {
            anyhow::bail!("source grid must be at least 2x2");
        }
        if self.levels == 0 {
            anyhow::bail!("levels must be > 0");
        }
        if self.iterations == 0 {
            anyhow::bail!("iterations must be > 0");
        }
        let (shallow, deep) = self.bathymetry;
        if !(shallow > 0.0 && deep > 0.0) {
            anyhow::bail!("bathymetry must be positive");
        }
        if let DestinationSpec::Scaled { factor } = self.destination {
            if !(factor > 0.0) {
                anyhow::bail!("destination factor must be > 0");
            }
        }
        self.regrid.validate()?;
        Ok(())
    }
}
