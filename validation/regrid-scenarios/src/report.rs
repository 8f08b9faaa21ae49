//! Results reporting and formatting.

use crate::runner::ScenarioResults;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

/// Formats scenario results for output.
pub struct ResultsReport;

impl ResultsReport {
    /// Format results as a console table.
    pub fn format_table(results: &ScenarioResults) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![format!("Scenario Results: {}", results.config_name)]);

        table.add_row(vec![
            "Source grid:",
            &format!("{} x {}", results.source_shape.0, results.source_shape.1),
        ]);
        table.add_row(vec![
            "Destination grid:",
            &format!(
                "{} x {}",
                results.destination_shape.0, results.destination_shape.1
            ),
        ]);
        table.add_row(vec![
            "Levels:",
            &format!(
                "{} native -> {} depth",
                results.native_levels, results.depth_levels
            ),
        ]);
        table.add_row(vec!["Iterations:", &format!("{}", results.iterations)]);

        table.add_row(vec!["", ""]);
        table.add_row(vec!["Timing (ms)", "lookup / resampler / 2D / 3D / products"]);
        table.add_row(vec![
            "",
            &format!(
                "{:.2} / {:.2} / {:.2} / {:.2} / {:.2}",
                results.lookup_ms,
                results.resampler_ms,
                results.horizontal_ms,
                results.vertical_ms,
                results.extraction_ms
            ),
        ]);

        table.add_row(vec!["", ""]);
        table.add_row(vec![
            "Water / land cells:",
            &format!("{} / {}", results.water_cells, results.land_cells),
        ]);
        table.add_row(vec![
            "Resolved levels:",
            &format!(
                "{:.1} mean, {} max",
                results.mean_resolved_levels, results.max_resolved_levels
            ),
        ]);
        table.add_row(vec![
            "Sentinel fraction:",
            &format!("{:.1}%", results.sentinel_fraction * 100.0),
        ]);
        table.add_row(vec!["Mean surface:", &format_optional(results.mean_surface)]);
        table.add_row(vec![
            "Mean velocity surface:",
            &format_optional(results.mean_velocity_surface),
        ]);
        table.add_row(vec!["Mean bottom:", &format_optional(results.mean_bottom)]);
        for (limit, mean) in &results.column_sums {
            table.add_row(vec![
                format!("Column sum <= {} m:", limit),
                format_optional(*mean),
            ]);
        }

        table.to_string()
    }

    /// Format results as JSON.
    pub fn format_json(results: &ScenarioResults) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(results)?)
    }

    /// Format results as CSV row.
    pub fn format_csv(results: &ScenarioResults) -> String {
        format!(
            "{},{},{},{},{:.3},{:.3},{:.3},{:.3},{},{},{:.2},{:.4}",
            results.config_name,
            results.destination_shape.0 * results.destination_shape.1,
            results.native_levels,
            results.depth_levels,
            results.lookup_ms,
            results.horizontal_ms,
            results.vertical_ms,
            results.extraction_ms,
            results.water_cells,
            results.land_cells,
            results.mean_resolved_levels,
            results.sentinel_fraction
        )
    }

    /// CSV header row.
    pub fn csv_header() -> &'static str {
        "scenario,cells,native_levels,depth_levels,lookup_ms,horizontal_ms,vertical_ms,extraction_ms,water,land,mean_levels,sentinel_fraction"
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScenarioResults {
        ScenarioResults {
            config_name: "sample".to_string(),
            source_shape: (20, 30),
            destination_shape: (15, 25),
            native_levels: 10,
            depth_levels: 136,
            iterations: 1,
            lookup_ms: 1.0,
            resampler_ms: 2.0,
            horizontal_ms: 0.1,
            vertical_ms: 3.0,
            extraction_ms: 0.5,
            water_cells: 300,
            land_cells: 75,
            mean_resolved_levels: 42.0,
            max_resolved_levels: 60,
            sentinel_fraction: 0.7,
            mean_surface: Some(18.0),
            mean_velocity_surface: Some(0.48),
            mean_bottom: None,
            column_sums: vec![(10.0, Some(50.0))],
        }
    }

    #[test]
    fn test_csv_matches_header() {
        let row = ResultsReport::format_csv(&sample());
        assert_eq!(
            row.split(',').count(),
            ResultsReport::csv_header().split(',').count()
        );
        assert!(row.starts_with("sample,375,"));
    }

    #[test]
    fn test_table_mentions_column_sums() {
        let table = ResultsReport::format_table(&sample());
        assert!(table.contains("Scenario Results: sample"));
        assert!(table.contains("Column sum <= 10 m:"));
        assert!(table.contains("0.480"));
    }

    #[test]
    fn test_json_round_trips() {
        let json = ResultsReport::format_json(&sample()).unwrap();
        let parsed: ScenarioResults = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.water_cells, 300);
        assert_eq!(parsed.mean_bottom, None);
    }
}
