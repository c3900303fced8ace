//! Stage commands: clean, aqi, meteo and the full run

use super::shared::build_processor;
use crate::cli::args::{AqiArgs, CleanArgs, MeteoArgs, RunArgs};
use crate::error::{AqiError, Result};
use crate::models::ProcessingStats;
use tracing::info;

pub async fn run_clean(args: CleanArgs) -> Result<ProcessingStats> {
    let processor = build_processor(&args.common)?;
    info!("Starting clean stage");

    let (_, stats) = processor.clean().await?;
    Ok(stats)
}

pub async fn run_aqi(args: AqiArgs) -> Result<ProcessingStats> {
    let processor = build_processor(&args.common)?;
    info!("Starting AQI stage in {:?} mode", args.mode);

    let observations = processor.load_clean_table(args.clean_file.as_deref())?;
    let (_, stats) = processor.compute_aqi(observations, args.mode)?;
    Ok(stats)
}

/// Recomputes the aggregate readings from the clean table, then joins weather
pub async fn run_meteo(args: MeteoArgs) -> Result<ProcessingStats> {
    let processor = build_processor(&args.common)?;
    info!("Starting meteo stage");

    let meteo_file = processor
        .locate_meteo_file(args.meteo_file.as_deref())?
        .ok_or_else(|| AqiError::NoInputFiles {
            path: args.common.input_path(),
            pattern: processor.config().meteo_file_pattern.clone(),
        })?;

    let observations = processor.load_clean_table(args.clean_file.as_deref())?;
    let (readings, dropped) = processor.aggregate(&observations);

    let mut stats = processor.enrich_with_meteo(readings, &meteo_file)?;
    stats.observations = observations.len();
    stats.rows_dropped = dropped;
    Ok(stats)
}

pub async fn run_all(args: RunArgs) -> Result<ProcessingStats> {
    let processor = build_processor(&args.common)?;
    info!("Starting full pipeline");

    processor.run_pipeline(args.meteo_file.as_deref()).await
}
