//! Command-line argument definitions for the air-quality processor
//!
//! This module defines the CLI interface using the clap derive API. Every
//! subcommand shares [`CommonArgs`]; values given on the command line override
//! the configuration file, which overrides the built-in defaults.

use crate::config::{AqiConfig, OutputFormat};
use crate::constants::{DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use crate::error::{AqiError, Result};
use crate::models::ComputationMode;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the Barcelona air-quality processor
///
/// Reshapes the monthly measurement files published by the Barcelona open-data
/// portal and scores every reading with a breakpoint-based Air Quality Index.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "aqi-processor",
    version,
    about = "Clean Barcelona air-quality data and compute AQI tables",
    long_about = "Batch tool that melts the monthly wide-format air-quality files into a long \
                  table, computes per-pollutant and overall Air Quality Index values with their \
                  categories, and optionally attaches daily precipitation and wind speed from \
                  the XEMA meteorological network."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Melt monthly files into the clean long table
    Clean(CleanArgs),
    /// Compute AQI tables from the clean table
    Aqi(AqiArgs),
    /// Attach daily weather to the aggregate AQI table
    Meteo(MeteoArgs),
    /// Run clean, both AQI modes and meteo enrichment in sequence
    Run(RunArgs),
}

impl Commands {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Clean(args) => &args.common,
            Commands::Aqi(args) => &args.common,
            Commands::Meteo(args) => &args.common,
            Commands::Run(args) => &args.common,
        }
    }
}

/// Options shared by every subcommand
#[derive(Debug, Clone, ClapArgs)]
pub struct CommonArgs {
    /// Directory holding the monthly files and lookup tables
    ///
    /// Monthly files may sit in per-year subdirectories.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help = "Directory with the raw air-quality files"
    )]
    pub input_path: Option<PathBuf>,

    /// Directory receiving the derived tables, created if missing
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Directory for the derived tables"
    )]
    pub output_path: Option<PathBuf>,

    /// TOML configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Number of monthly files read concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of parallel workers for reading files"
    )]
    pub workers: Option<usize>,

    /// Output table format
    #[arg(long = "format", value_enum, help = "Output table format")]
    pub format: Option<OutputFormat>,

    /// Keep rows whose AQI could not be computed
    #[arg(
        long = "keep-missing-aqi",
        help = "Keep rows without an AQI in the output tables"
    )]
    pub keep_missing_aqi: bool,

    /// Disable progress bars
    #[arg(long = "no-progress", help = "Disable progress bars")]
    pub no_progress: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct CleanArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Clone, Parser)]
pub struct AqiArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Which AQI tables to produce
    #[arg(long = "mode", value_enum, default_value = "both", help = "AQI computation mode")]
    pub mode: ComputationMode,

    /// Clean table to score instead of the one in the output directory
    #[arg(long = "clean-file", value_name = "FILE", help = "Clean table to read")]
    pub clean_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct MeteoArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Clean table to score instead of the one in the output directory
    #[arg(long = "clean-file", value_name = "FILE", help = "Clean table to read")]
    pub clean_file: Option<PathBuf>,

    /// XEMA daily file; searched for in the input directory when omitted
    #[arg(long = "meteo-file", value_name = "FILE", help = "XEMA meteorological file")]
    pub meteo_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// XEMA daily file; searched for in the input directory when omitted
    #[arg(long = "meteo-file", value_name = "FILE", help = "XEMA meteorological file")]
    pub meteo_file: Option<PathBuf>,
}

impl CommonArgs {
    /// Validate arguments that configuration validation cannot see
    pub fn validate(&self) -> Result<()> {
        if let Some(input_path) = &self.input_path {
            if !input_path.exists() {
                return Err(AqiError::configuration(format!(
                    "Input path does not exist: {}",
                    input_path.display()
                )));
            }

            if !input_path.is_dir() {
                return Err(AqiError::configuration(format!(
                    "Input path is not a directory: {}",
                    input_path.display()
                )));
            }
        }

        if let Some(output_path) = &self.output_path {
            if output_path.is_file() {
                return Err(AqiError::configuration(format!(
                    "Output path is a file: {}",
                    output_path.display()
                )));
            }
        }

        Ok(())
    }

    pub fn input_path(&self) -> PathBuf {
        self.input_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Get log level from verbosity
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are hidden in quiet mode too
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }

    /// Layer defaults, the configuration file and command-line overrides
    pub fn to_config(&self) -> Result<AqiConfig> {
        let mut config = match &self.config_file {
            Some(path) => AqiConfig::from_file(path)?,
            None => AqiConfig::default(),
        };

        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(format) = self.format {
            config = config.with_output_format(format);
        }
        if self.keep_missing_aqi {
            config = config.keeping_missing_aqi();
        }
        if !self.show_progress() {
            config = config.with_show_progress(false);
        }

        config.validate()?;
        Ok(config)
    }
}
