//! Core data structures shared across the pipeline.
//!
//! Raw lookup records, the long-format observation produced by the clean
//! stage, daily meteorological values and processing statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Station metadata from the registry file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    pub code: String,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One hourly measurement in long format, with lookup metadata joined in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub hour: u8,
    pub station_code: String,
    pub station_name: Option<String>,
    pub pollutant_code: String,
    /// Free-text pollutant description, `None` when the code is not in the dictionary
    pub pollutant_label: Option<String>,
    /// Missing when the source cell was empty or unparseable
    pub concentration: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Observation {
    /// Key used to order observations deterministically
    pub fn sort_key(&self) -> (NaiveDate, u8, &str, &str) {
        (
            self.date,
            self.hour,
            self.station_code.as_str(),
            self.pollutant_code.as_str(),
        )
    }
}

/// Identity of a wide-mode row: one station at one hour
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObservationKey {
    pub date: NaiveDate,
    pub hour: u8,
    pub station_code: String,
}

impl From<&Observation> for ObservationKey {
    fn from(observation: &Observation) -> Self {
        Self {
            date: observation.date,
            hour: observation.hour,
            station_code: observation.station_code.clone(),
        }
    }
}

/// Daily meteorological values averaged over every XEMA station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeteoDay {
    pub date: NaiveDate,
    pub precipitation_mm: Option<f64>,
    pub wind_speed_ms: Option<f64>,
}

/// How AQI values are computed from the long table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ComputationMode {
    /// One row per station and hour; the worst pollutant sets the AQI
    Aggregate,
    /// One AQI per measurement, independent of the other pollutants
    Individual,
    /// Produce both tables
    Both,
}

impl ComputationMode {
    pub fn includes_aggregate(&self) -> bool {
        matches!(self, ComputationMode::Aggregate | ComputationMode::Both)
    }

    pub fn includes_individual(&self) -> bool {
        matches!(self, ComputationMode::Individual | ComputationMode::Both)
    }
}

/// Processing statistics
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub observations: usize,
    pub aggregate_rows: usize,
    pub individual_rows: usize,
    pub rows_dropped: usize,
    pub output_paths: Vec<PathBuf>,
    pub processing_time_ms: u128,
}

impl ProcessingStats {
    /// Fold the counters of a later stage into this one.
    ///
    /// `observations` is the size of the clean table every stage reads, so it
    /// is taken from the later stage only when this one has none.
    pub fn merge(&mut self, other: ProcessingStats) {
        self.files_processed += other.files_processed;
        self.files_failed += other.files_failed;
        if self.observations == 0 {
            self.observations = other.observations;
        }
        self.aggregate_rows += other.aggregate_rows;
        self.individual_rows += other.individual_rows;
        self.rows_dropped += other.rows_dropped;
        self.output_paths.extend(other.output_paths);
    }
}
