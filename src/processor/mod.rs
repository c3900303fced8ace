//! Processing engine for the air-quality pipeline.
//!
//! Orchestrates the three stages using specialized modules for file
//! discovery, reshaping, meteorological enrichment and table writing:
//!
//! 1. **clean**: melt the monthly wide files into one long table
//! 2. **aqi**: score the long table in aggregate and/or individual mode
//! 3. **meteo**: attach daily precipitation and wind to the aggregate table

pub mod discovery;
pub mod meteo;
pub mod reader;
pub mod reshape;
pub mod summary;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::discovery::FileDiscovery;
use self::meteo::{join_meteo, load_meteo};
use self::reader::{load_pollutants, load_stations, read_clean_table};
use self::reshape::{
    HourColumnMatcher, LongRecord, join_metadata, pivot_aggregate, read_monthly_file,
};
use self::summary::{AqiSummary, CleanSummary, MeteoSummary, PollutantSummary};
use self::writer::{TableWriter, aggregate_frame, clean_frame, enriched_frame, individual_frame};

use crate::aqi::{AggregateAqiReading, score_individually};
use crate::config::AqiConfig;
use crate::constants::{HOUR_COLUMN_REGEX, output_files};
use crate::error::{AqiError, Result};
use crate::models::{ComputationMode, Observation, ProcessingStats};

use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{debug, error, info, warn};

/// Main processor for the air-quality pipeline
#[derive(Debug)]
pub struct AirQualityProcessor {
    input_path: PathBuf,
    output_path: PathBuf,
    config: AqiConfig,
    writer: TableWriter,
}

impl AirQualityProcessor {
    /// Create a processor reading raw files from `input_path` and writing
    /// derived tables into `output_path`
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Self {
        let config = AqiConfig::default();
        let writer = TableWriter::new(output_path.clone(), config.output_format);

        Self {
            input_path,
            output_path,
            config,
            writer,
        }
    }

    /// Configure the processor
    pub fn with_config(mut self, config: AqiConfig) -> Self {
        self.writer = TableWriter::new(self.output_path.clone(), config.output_format);
        self.config = config;
        self
    }

    pub fn config(&self) -> &AqiConfig {
        &self.config
    }

    /// Path of a derived table in the configured output format
    pub fn output_file(&self, stem: &str) -> PathBuf {
        self.writer.output_path(stem)
    }

    fn progress_bar(&self, len: usize, message: &'static str) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb.set_message(message);
        pb
    }

    /// Clean stage: melt every monthly file, join lookups, write the long table.
    ///
    /// A malformed monthly file is skipped and counted as failed; the stage
    /// only fails when no file could be read.
    pub async fn clean(&self) -> Result<(Vec<Observation>, ProcessingStats)> {
        let start_time = Instant::now();
        println!(
            "{}",
            "Cleaning air-quality measurements".bright_green().bold()
        );
        println!("  {} {}", "Input:".bright_cyan(), self.input_path.display());
        println!("  {} {}", "Output:".bright_cyan(), self.output_path.display());

        let discovery =
            FileDiscovery::new(self.input_path.clone(), &self.config.monthly_file_pattern)?;

        println!("\n{}", "Discovering monthly files...".bright_yellow());
        let files = discovery.discover_monthly_files()?;
        if files.is_empty() {
            return Err(AqiError::NoInputFiles {
                path: self.input_path.clone(),
                pattern: self.config.monthly_file_pattern.clone(),
            });
        }
        println!(
            "  {} {} monthly files",
            "Found".bright_green(),
            files.len().to_string().bright_white().bold()
        );

        let pollutants = load_pollutants(&discovery.resolve_lookup(&self.config.pollutants_file)?)?;
        let stations = load_stations(&discovery.resolve_lookup(&self.config.stations_file)?)?;
        info!(
            "Loaded {} pollutants and {} stations",
            pollutants.len(),
            stations.len()
        );

        println!("\n{}", "Reading files...".bright_yellow());
        let (records, mut stats) = self.read_monthly_files(&files).await?;

        let mut observations = join_metadata(records, &pollutants, &stations);
        observations.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        stats.observations = observations.len();

        let path = self
            .writer
            .write_frame(output_files::CLEAN, clean_frame(&observations)?)?;
        info!("Clean table written to {}", path.display());
        stats.output_paths.push(path);

        CleanSummary::from_observations(&observations).report();
        if stats.files_failed > 0 {
            println!(
                "  {} {}",
                "Files failed:".bright_red(),
                stats.files_failed.to_string().bright_red().bold()
            );
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        Ok((observations, stats))
    }

    /// Read monthly files concurrently, bounded by the worker count
    async fn read_monthly_files(
        &self,
        files: &[PathBuf],
    ) -> Result<(Vec<LongRecord>, ProcessingStats)> {
        let matcher = Arc::new(HourColumnMatcher::new(HOUR_COLUMN_REGEX)?);
        let pb = self.progress_bar(files.len(), "Reading monthly files");
        let concurrent_limit = self.config.workers.clamp(1, files.len().max(1));
        debug!("Reading {} files with {} workers", files.len(), concurrent_limit);

        let mut results = stream::iter(files.iter().cloned())
            .map(|path| {
                let matcher = Arc::clone(&matcher);
                let pb = pb.clone();
                async move {
                    if let Some(file_name) = path.file_name() {
                        pb.set_message(format!("Reading: {}", file_name.to_string_lossy()));
                    }

                    let task_path = path.clone();
                    let result =
                        task::spawn_blocking(move || read_monthly_file(&task_path, &matcher))
                            .await
                            .map_err(|e| AqiError::ProcessingFailed {
                                path: path.clone(),
                                reason: format!("Reader task failed: {}", e),
                            })
                            .and_then(|result| result);
                    pb.inc(1);

                    (path, result)
                }
            })
            .buffer_unordered(concurrent_limit)
            .collect::<Vec<_>>()
            .await;
        pb.finish_and_clear();

        // Completion order is arbitrary; merge in path order
        results.sort_by(|a, b| a.0.cmp(&b.0));

        let mut records = Vec::new();
        let mut stats = ProcessingStats::default();
        for (path, result) in results {
            match result {
                Ok(mut file_records) => {
                    debug!(
                        "Read {} records from {}",
                        file_records.len(),
                        path.display()
                    );
                    records.append(&mut file_records);
                    stats.files_processed += 1;
                }
                Err(e) if e.is_critical() => return Err(e),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    stats.files_failed += 1;
                }
            }
        }

        if stats.files_processed == 0 {
            error!("None of the {} monthly files could be read", files.len());
            return Err(AqiError::ProcessingFailed {
                path: self.input_path.clone(),
                reason: format!("All {} monthly files failed to parse", files.len()),
            });
        }

        Ok((records, stats))
    }

    /// Load the clean table, defaulting to the one in the output directory
    pub fn load_clean_table(&self, path: Option<&Path>) -> Result<Vec<Observation>> {
        let path = path.map_or_else(|| self.output_file(output_files::CLEAN), Path::to_path_buf);
        info!("Loading clean table from {}", path.display());
        read_clean_table(&path)
    }

    /// Aggregate readings per station and hour; returns the readings kept and
    /// the number dropped for lacking an AQI
    pub fn aggregate(&self, observations: &[Observation]) -> (Vec<AggregateAqiReading>, usize) {
        let mut readings = pivot_aggregate(observations);
        let before = readings.len();
        if self.config.drop_missing_aqi {
            readings.retain(|reading| reading.overall_aqi.is_some());
        }
        let dropped = before - readings.len();
        debug!(
            "Aggregated {} station-hours, dropped {} without AQI",
            before, dropped
        );
        (readings, dropped)
    }

    /// AQI stage. Returns the aggregate readings (empty when the mode skips
    /// aggregate scoring) so a later meteo stage can reuse them.
    pub fn compute_aqi(
        &self,
        observations: Vec<Observation>,
        mode: ComputationMode,
    ) -> Result<(Vec<AggregateAqiReading>, ProcessingStats)> {
        let start_time = Instant::now();
        let mut stats = ProcessingStats {
            observations: observations.len(),
            ..Default::default()
        };
        let mut aggregate = Vec::new();

        if mode.includes_aggregate() {
            println!("\n{}", "Computing aggregate AQI...".bright_yellow());
            let (readings, dropped) = self.aggregate(&observations);

            let path = self
                .writer
                .write_frame(output_files::AGGREGATE, aggregate_frame(&readings)?)?;
            info!("Aggregate AQI written to {}", path.display());

            AqiSummary::from_readings(&readings).report();
            stats.aggregate_rows = readings.len();
            stats.rows_dropped += dropped;
            stats.output_paths.push(path);
            aggregate = readings;
        }

        if mode.includes_individual() {
            println!("\n{}", "Computing individual AQI...".bright_yellow());
            let mut readings = score_individually(observations);
            let before = readings.len();
            if self.config.drop_missing_aqi {
                readings.retain(|reading| reading.has_index());
            }
            let dropped = before - readings.len();

            let path = self
                .writer
                .write_frame(output_files::INDIVIDUAL, individual_frame(&readings)?)?;
            info!("Individual AQI written to {}", path.display());

            PollutantSummary::from_readings(&readings).report();
            stats.individual_rows = readings.len();
            stats.rows_dropped += dropped;
            stats.output_paths.push(path);
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        Ok((aggregate, stats))
    }

    /// Resolve the XEMA file: an explicit path must exist, otherwise the
    /// input directory is searched with the configured pattern
    pub fn locate_meteo_file(&self, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(AqiError::InputNotFound {
                    path: path.to_path_buf(),
                });
            }
            return Ok(Some(path.to_path_buf()));
        }

        if !self.input_path.is_dir() {
            return Ok(None);
        }

        FileDiscovery::new(self.input_path.clone(), &self.config.monthly_file_pattern)?
            .find_meteo_file(&self.config.meteo_file_pattern)
    }

    /// Meteo stage: left-join daily weather onto aggregate readings
    pub fn enrich_with_meteo(
        &self,
        readings: Vec<AggregateAqiReading>,
        meteo_file: &Path,
    ) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        println!("\n{}", "Integrating meteorological data...".bright_yellow());
        println!("  {} {}", "Meteo file:".bright_cyan(), meteo_file.display());

        let days = load_meteo(meteo_file, &self.config.meteo_variables)?;
        let enriched = join_meteo(readings, &days);

        let path = self
            .writer
            .write_frame(output_files::METEO, enriched_frame(&enriched)?)?;
        info!("Enriched table written to {}", path.display());

        MeteoSummary::from_readings(&enriched).report();

        Ok(ProcessingStats {
            aggregate_rows: enriched.len(),
            output_paths: vec![path],
            processing_time_ms: start_time.elapsed().as_millis(),
            ..Default::default()
        })
    }

    /// Full pipeline: clean, both AQI modes, then meteo when a file is found
    pub async fn run_pipeline(&self, meteo_file: Option<&Path>) -> Result<ProcessingStats> {
        let start_time = Instant::now();

        let (observations, mut stats) = self.clean().await?;
        let (aggregate, aqi_stats) = self.compute_aqi(observations, ComputationMode::Both)?;
        stats.merge(aqi_stats);

        match self.locate_meteo_file(meteo_file)? {
            Some(path) => {
                let meteo_stats = self.enrich_with_meteo(aggregate, &path)?;
                stats.output_paths.extend(meteo_stats.output_paths);
            }
            None => {
                warn!("No meteorological file found, skipping enrichment");
            }
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();

        println!("\n{}", "Processing Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            stats.processing_time_ms.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Files processed:".bright_cyan(),
            stats.files_processed.to_string().bright_white()
        );
        if stats.files_failed > 0 {
            println!(
                "  {} {}",
                "Files failed:".bright_red(),
                stats.files_failed.to_string().bright_red().bold()
            );
        }
        for path in &stats.output_paths {
            println!("  {} {}", "Wrote".bright_cyan(), path.display());
        }

        Ok(stats)
    }
}
