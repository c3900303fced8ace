//! Command implementations for the air-quality processor CLI
//!
//! Each subcommand sets up logging, resolves its configuration and drives the
//! matching [`AirQualityProcessor`](crate::processor::AirQualityProcessor)
//! stage.

pub mod pipeline;
pub mod shared;

use crate::cli::args::{Args, Commands};
use crate::error::{AqiError, Result};
use crate::models::ProcessingStats;

/// Dispatch to the subcommand handler
pub async fn run(args: Args) -> Result<ProcessingStats> {
    let Some(command) = args.command else {
        return Err(AqiError::configuration("No subcommand given"));
    };

    shared::setup_logging(command.common())?;

    match command {
        Commands::Clean(clean_args) => pipeline::run_clean(clean_args).await,
        Commands::Aqi(aqi_args) => pipeline::run_aqi(aqi_args).await,
        Commands::Meteo(meteo_args) => pipeline::run_meteo(meteo_args).await,
        Commands::Run(run_args) => pipeline::run_all(run_args).await,
    }
}
