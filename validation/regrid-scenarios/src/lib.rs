//! Scenario validation for the regridding engine.
//!
//! This crate provides tools to:
//! - Describe synthetic model grids, masks and profiles in YAML
//! - Run them through the horizontal, vertical and column passes
//! - Collect timings and coverage statistics
//! - Output results in multiple formats (console, JSON, CSV)

pub mod config;
pub mod report;
pub mod runner;

pub use config::{DestinationSpec, ScenarioConfig, SourceSpec};
pub use report::ResultsReport;
pub use runner::{ScenarioResults, ScenarioRunner};
