//! Configuration for the regridding engine.

use std::path::Path;

use regrid_common::DepthTable;
use serde::{Deserialize, Serialize};

use crate::error::{RegridError, Result};

/// Configuration shared by the horizontal regridder, vertical resampler
/// and column extractors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegridConfig {
    /// Target depths in meters. `None` uses the standard 136-level table.
    pub depth_table: Option<Vec<f32>>,

    /// Surface extraction factor for tracers.
    pub surface_factor: f32,

    /// Surface extraction factor for velocity components.
    pub velocity_surface_factor: f32,

    /// Depth cutoffs (m) for column integrals.
    pub column_limits: Vec<f32>,

    /// Worker threads for the parallel passes. `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for RegridConfig {
    fn default() -> Self {
        Self {
            depth_table: None,
            surface_factor: 1.0,
            velocity_surface_factor: 1.2,
            column_limits: vec![10.0, 30.0],
            threads: None,
        }
    }
}

impl RegridConfig {
    /// Load configuration from `REGRID_*` environment variables.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("REGRID_DEPTH_TABLE") {
            if let Some(levels) = parse_list(&val) {
                config.depth_table = Some(levels);
            }
        }

        if let Some(val) = lookup("REGRID_SURFACE_FACTOR") {
            if let Ok(factor) = val.trim().parse() {
                config.surface_factor = factor;
            }
        }

        if let Some(val) = lookup("REGRID_VELOCITY_SURFACE_FACTOR") {
            if let Ok(factor) = val.trim().parse() {
                config.velocity_surface_factor = factor;
            }
        }

        if let Some(val) = lookup("REGRID_COLUMN_LIMITS") {
            if let Some(limits) = parse_list(&val) {
                config.column_limits = limits;
            }
        }

        if let Some(val) = lookup("REGRID_THREADS") {
            if let Ok(threads) = val.trim().parse() {
                config.threads = Some(threads);
            }
        }

        config
    }

    /// Load configuration from a YAML file. Missing keys take defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(levels) = &self.depth_table {
            DepthTable::new(levels.clone())?;
        }

        if !self.surface_factor.is_finite() || !self.velocity_surface_factor.is_finite() {
            return Err(RegridError::config("surface factors must be finite"));
        }

        if let Some(limit) = self
            .column_limits
            .iter()
            .find(|l| !l.is_finite() || **l <= 0.0)
        {
            return Err(RegridError::config(format!(
                "column limit {} must be a positive depth",
                limit
            )));
        }

        if self.threads == Some(0) {
            return Err(RegridError::config("threads must be > 0"));
        }

        Ok(())
    }

    /// The configured depth table, or the standard one.
    pub fn depth_table(&self) -> Result<DepthTable> {
        match &self.depth_table {
            Some(levels) => Ok(DepthTable::new(levels.clone())?),
            None => Ok(DepthTable::standard()),
        }
    }

    /// Build a rayon pool sized by `threads`.
    ///
    /// Run engine calls inside `pool.install(..)` to bound their parallelism.
    pub fn thread_pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads.unwrap_or(0))
            .build()
            .map_err(|e| RegridError::config(e.to_string()))
    }
}

/// Parse a comma or whitespace separated list of numbers.
fn parse_list(val: &str) -> Option<Vec<f32>> {
    val.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RegridConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.depth_table().unwrap().len(), 136);
        assert_eq!(config.velocity_surface_factor, 1.2);
        assert_eq!(config.column_limits, vec![10.0, 30.0]);
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("REGRID_DEPTH_TABLE", "5, 10, 20"),
            ("REGRID_SURFACE_FACTOR", "1.1"),
            ("REGRID_COLUMN_LIMITS", "10 50"),
            ("REGRID_THREADS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = RegridConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.depth_table, Some(vec![5.0, 10.0, 20.0]));
        assert_eq!(config.surface_factor, 1.1);
        assert_eq!(config.velocity_surface_factor, 1.2);
        assert_eq!(config.column_limits, vec![10.0, 50.0]);
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = RegridConfig {
            depth_table: Some(vec![10.0, 5.0]),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RegridError::Grid(_))));

        config.depth_table = None;
        config.column_limits = vec![10.0, -1.0];
        assert!(matches!(config.validate(), Err(RegridError::ConfigError(_))));

        config.column_limits = vec![10.0];
        config.threads = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "depth_table: [1.0, 2.5, 7.0]").unwrap();
        writeln!(file, "threads: 2").unwrap();

        let config = RegridConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.depth_table().unwrap().levels(), &[1.0, 2.5, 7.0]);
        assert_eq!(config.threads, Some(2));
        assert_eq!(config.surface_factor, 1.0);
    }

    #[test]
    fn test_from_yaml_file_rejects_invalid_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "depth_table: []").unwrap();
        assert!(RegridConfig::from_yaml_file(file.path()).is_err());
    }
}
