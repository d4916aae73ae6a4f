//! regrisk CLI - Regulatory Penalty and Investment Risk Analysis
//!
//! Command-line entry point for the regrisk engine.
//!
//! # Commands
//!
//! - `regrisk penalty --input <file>` - Fine for each violation record
//! - `regrisk aggregate --input <file> --revenue <amount>` - Capped cumulative fine
//! - `regrisk analyze --input <file>` - NPV, IRR, Monte Carlo, sensitivity and scenarios
//! - `regrisk check` - Validate and print the effective configuration
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate reads JSON records, loads
//! [`EngineConfig`] (TOML file, then `REGRISK_*` environment variables) and
//! delegates to the `service_api` facade. Reports go to stdout; logs go to
//! stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use service_api::{EngineConfig, LogLevel, RiskEngine};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;
mod output;

pub use error::{CliError, Result};
use output::OutputFormat;

const DEFAULT_CONFIG: &str = "regrisk.toml";

/// Regulatory penalty and investment risk CLI
#[derive(Parser)]
#[command(name = "regrisk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the fine for each violation record
    Penalty {
        /// JSON file with one violation record or an array of them
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Compute the capped cumulative fine of one entity
    Aggregate {
        /// JSON file with violation records
        #[arg(short, long)]
        input: PathBuf,

        /// Annual revenue the statutory cap is based on
        #[arg(short, long)]
        revenue: Decimal,

        /// Cap as a fraction of revenue, overriding the configuration
        #[arg(short, long)]
        max_fraction: Option<Decimal>,
    },

    /// Analyse an investment case
    Analyze {
        /// JSON file with the investment case
        #[arg(short, long)]
        input: PathBuf,

        /// Number of Monte Carlo trials
        #[arg(short, long)]
        trials: Option<usize>,

        /// Monte Carlo seed
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Validate the configuration and print the penalty schedule
    Check,
}

fn init_tracing(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_filter_str();
        EnvFilter::new(format!("regrisk={level},service_api={level}"))
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    // Only an explicitly named file has to exist
    let required = path != Path::new(DEFAULT_CONFIG);
    Ok(EngineConfig::load(path, required)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_tracing(if cli.verbose {
        LogLevel::Debug
    } else {
        config.log_level
    });
    info!(config = %cli.config.display(), "configuration loaded");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Penalty { input } => {
            let engine = RiskEngine::new(config)?;
            commands::penalty::run(&engine, &input, cli.format, &mut out)?;
        }
        Commands::Aggregate {
            input,
            revenue,
            max_fraction,
        } => commands::aggregate::run(&config, &input, revenue, max_fraction, cli.format, &mut out)?,
        Commands::Analyze { input, trials, seed } => {
            let engine = RiskEngine::new(config)?;
            commands::analyze::run(&engine, &input, trials, seed, cli.format, &mut out)?;
        }
        Commands::Check => commands::check::run(&config, &mut out)?,
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_aggregate() {
        let cli = Cli::try_parse_from([
            "regrisk",
            "--format",
            "csv",
            "aggregate",
            "--input",
            "violations.json",
            "--revenue",
            "100000000",
            "--max-fraction",
            "0.04",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Csv);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG));
        match cli.command {
            Commands::Aggregate {
                revenue,
                max_fraction,
                ..
            } => {
                assert_eq!(revenue, Decimal::from(100_000_000));
                assert_eq!(max_fraction, Some(Decimal::new(4, 2)));
            }
            _ => panic!("expected aggregate"),
        }
    }

    #[test]
    fn test_bad_format_rejected() {
        assert!(Cli::try_parse_from(["regrisk", "--format", "xml", "check"]).is_err());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
