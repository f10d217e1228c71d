//! Scenario replay binary for gridlog.
//!
//! Replays a YAML scenario against an empty tracked network and prints the
//! resulting report (labelled snapshots of the changes visible to selected
//! variants) as JSON on stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Parse the command line
//! 2. Load configuration from `--config`, or `gridlog-config.yaml` when
//!    present, or defaults
//! 3. Initialize structured logging (tracing)
//! 4. Load and replay the scenario
//! 5. Print the report and log a summary

mod error;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridlog_core::config::GridlogConfig;
use gridlog_core::scenario::{self, Scenario};

use crate::error::ReplayError;

/// Configuration file looked up in the working directory.
const DEFAULT_CONFIG_PATH: &str = "gridlog-config.yaml";

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Replay a gridlog scenario and print visible changes",
    long_about = None
)]
struct Cli {
    /// Scenario file to replay
    scenario: PathBuf,
    /// Configuration file (defaults to gridlog-config.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print compact JSON instead of pretty-printed JSON
    #[arg(long)]
    compact: bool,
}

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, the scenario, or the output fails.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 1. Load configuration before logging so its level can apply.
    let (config, config_source) = load_config(cli.config.as_deref())?;

    // 2. Initialize structured logging; RUST_LOG wins over the config.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("gridlog-replay starting");
    info!(
        source = %config_source,
        initial_variant = %config.variants.initial_variant_id,
        classification_rules = config.classification.rules.len(),
        standard_table = config.classification.use_standard_table,
        "Configuration loaded"
    );

    // 3. Replay.
    run(&cli, &config)?;
    Ok(())
}

fn run(cli: &Cli, config: &GridlogConfig) -> Result<(), ReplayError> {
    if !cli.scenario.is_file() {
        return Err(ReplayError::Usage {
            message: format!("scenario file not found: {}", cli.scenario.display()),
        });
    }
    let scenario = Scenario::from_file(&cli.scenario)?;
    info!(
        name = %scenario.name,
        steps = scenario.steps.len(),
        path = %cli.scenario.display(),
        "Scenario loaded"
    );

    let report = scenario::replay(config, &scenario)?;

    let json = if cli.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{json}");

    info!(
        run_id = %report.run_id,
        snapshots = report.snapshots.len(),
        variants = report.variants.len(),
        next_sequence = report.next_sequence,
        "Replay complete"
    );
    Ok(())
}

/// Load configuration from `explicit`, or from `gridlog-config.yaml` when it
/// exists, or fall back to defaults.
///
/// Returns the configuration and a description of where it came from.
fn load_config(explicit: Option<&Path>) -> Result<(GridlogConfig, String), ReplayError> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ReplayError::Usage {
                message: format!("config file not found: {}", path.display()),
            });
        }
        return Ok((GridlogConfig::from_file(path)?, path.display().to_string()));
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        Ok((
            GridlogConfig::from_file(default_path)?,
            DEFAULT_CONFIG_PATH.to_owned(),
        ))
    } else {
        let mut config = GridlogConfig::default();
        config.logging.apply_env_overrides();
        Ok((config, "defaults".to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cli_takes_scenario_and_optional_config() {
        let cli = Cli::try_parse_from(["gridlog-replay", "scenario.yaml"]).unwrap();
        assert_eq!(cli.scenario, PathBuf::from("scenario.yaml"));
        assert!(cli.config.is_none());
        assert!(!cli.compact);

        let cli = Cli::try_parse_from([
            "gridlog-replay",
            "--config",
            "custom.yaml",
            "--compact",
            "scenario.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        assert!(cli.compact);

        assert!(Cli::try_parse_from(["gridlog-replay"]).is_err());
    }

    #[test]
    fn explicit_missing_config_is_a_usage_error() {
        let result = load_config(Some(Path::new("does-not-exist.yaml")));
        assert!(matches!(result, Err(ReplayError::Usage { .. })));
    }

    #[test]
    fn missing_scenario_is_a_usage_error() {
        let cli = Cli::try_parse_from(["gridlog-replay", "does-not-exist.yaml"]).unwrap();
        let result = run(&cli, &GridlogConfig::default());
        assert!(matches!(result, Err(ReplayError::Usage { .. })));
    }
}
