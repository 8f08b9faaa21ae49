//! Scenario runner CLI for the regridding engine.

use clap::{Parser, Subcommand};
use regrid_scenarios::{ResultsReport, ScenarioConfig, ScenarioResults, ScenarioRunner};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "regrid-scenarios")]
#[command(about = "Runs synthetic regridding scenarios through the engine", long_about = None)]
struct Cli {
    /// Log level or filter directives (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RUST_LOG", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file
    Run {
        /// Path to scenario YAML file
        #[arg(short, long)]
        scenario: PathBuf,

        /// Override worker thread count
        #[arg(short, long)]
        threads: Option<usize>,

        /// Override iteration count
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Output format: table (default), json, csv
        #[arg(short, long, default_value = "table")]
        output: String,
    },

    /// Run a quick smoke scenario
    Quick {
        /// Source grid columns
        #[arg(long, default_value = "120")]
        width: usize,

        /// Source grid rows
        #[arg(long, default_value = "80")]
        height: usize,

        /// Native sigma levels
        #[arg(short, long, default_value = "20")]
        levels: usize,
    },

    /// List available scenarios
    List {
        /// Scenarios directory
        #[arg(short, long, default_value = "scenarios")]
        dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs)?;

    match cli.command {
        Commands::Run {
            scenario,
            threads,
            iterations,
            output,
        } => {
            println!("Loading scenario: {}", scenario.display());

            let mut config = ScenarioConfig::from_file(&scenario)?;

            if let Some(t) = threads {
                config.regrid.threads = Some(t);
            }
            if let Some(i) = iterations {
                config.iterations = i;
            }

            config.validate()?;

            println!("✓ Configuration loaded successfully");
            println!("  Name: {}", config.name);
            println!("  Description: {}", config.description);
            println!(
                "  Source: {} x {}, {} levels",
                config.source.height, config.source.width, config.levels
            );
            println!("  Iterations: {}", config.iterations);
            println!();

            let results = ScenarioRunner::new(config).run()?;
            print_results(&results, &output)?;

            Ok(())
        }
        Commands::Quick {
            width,
            height,
            levels,
        } => {
            println!("Running quick scenario:");
            println!("  Source: {} x {}", height, width);
            println!("  Levels: {}", levels);
            println!();

            let config = ScenarioConfig::quick(width, height, levels);
            config.validate()?;

            let results = ScenarioRunner::new(config).run()?;
            print_results(&results, "table")?;

            Ok(())
        }
        Commands::List { dir } => {
            println!("Available scenarios in {}:", dir.display());
            println!();

            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    eprintln!("Error reading directory: {}", e);
                    eprintln!("Make sure the directory exists and is readable");
                    return Ok(());
                }
            };

            let mut scenarios = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|s| s.to_str()) != Some("yaml") {
                    continue;
                }
                // Try to load the config to get name and description
                if let Ok(config) = ScenarioConfig::from_file(&path) {
                    let filename = entry.file_name().to_string_lossy().to_string();
                    scenarios.push((filename, config.name, config.description));
                }
            }

            scenarios.sort_by(|a, b| a.0.cmp(&b.0));

            if scenarios.is_empty() {
                println!("No scenario files found");
            } else {
                for (filename, name, desc) in scenarios {
                    println!("  {} - {}", filename, name);
                    println!("    {}", desc);
                    println!();
                }
            }

            Ok(())
        }
    }
}

fn init_tracing(log_level: &str, json: bool) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level)?,
    };

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr);

    if json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
    }

    info!(filter = %log_level, "Logging initialized");
    Ok(())
}

fn print_results(results: &ScenarioResults, output: &str) -> anyhow::Result<()> {
    match output {
        "json" => {
            println!("{}", ResultsReport::format_json(results)?);
        }
        "csv" => {
            println!("{}", ResultsReport::csv_header());
            println!("{}", ResultsReport::format_csv(results));
        }
        _ => {
            println!("{}", ResultsReport::format_table(results));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_flag_accepts_filter_directives() {
        let cli = Cli::try_parse_from([
            "regrid-scenarios",
            "--log-level",
            "regrid_engine=debug,warn",
            "list",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "regrid_engine=debug,warn");
        assert!(EnvFilter::try_new(&cli.log_level).is_ok());
        assert!(matches!(cli.command, Commands::List { .. }));
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from([
            "regrid-scenarios",
            "run",
            "--scenario",
            "scenarios/short_table.yaml",
            "--threads",
            "2",
            "--output",
            "csv",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                threads, output, ..
            } => {
                assert_eq!(threads, Some(2));
                assert_eq!(output, "csv");
            }
            _ => panic!("expected run subcommand"),
        }
    }
}
