//! Wide-to-long reshaping and lookup joins
//!
//! Monthly files carry one row per (station, pollutant, day) and one column
//! per hour. This module melts them into hourly records, left-joins the
//! pollutant dictionary and station registry, and groups the resulting
//! observations per station and hour for wide-mode scoring.

use super::reader::{normalize_code, parse_integer, parse_number, read_string_frame, string_column};
use crate::aqi::AggregateAqiReading;
use crate::constants::{MAX_HOUR, raw_columns};
use crate::error::{AqiError, Result};
use crate::models::{Observation, ObservationKey, StationInfo};
use chrono::NaiveDate;
use polars::prelude::*;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, warn};

/// One melted cell of a monthly file, before lookups are joined
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub date: NaiveDate,
    pub hour: u8,
    pub station_code: String,
    pub pollutant_code: String,
    pub value: Option<f64>,
}

/// Recognizes hour columns and extracts their hour number
#[derive(Debug, Clone)]
pub struct HourColumnMatcher {
    regex: Regex,
}

impl HourColumnMatcher {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| {
            AqiError::configuration(format!("Invalid hour column pattern '{}': {}", pattern, e))
        })?;
        Ok(Self { regex })
    }

    /// Hour encoded in a column name, `None` for id and administrative columns
    pub fn hour_of(&self, column: &str) -> Option<u32> {
        if raw_columns::ID_COLUMNS.contains(&column)
            || raw_columns::NON_HOUR_COLUMNS.contains(&column)
        {
            return None;
        }

        self.regex
            .captures(column)
            .and_then(|captures| captures.get(1))
            .and_then(|digits| digits.as_str().parse().ok())
    }
}

/// Read a monthly file and melt it into long records.
///
/// Fails when an id column is missing, no hour column is found or an hour is
/// out of range; callers treat such a failure as "skip this file". Rows
/// without a station, a pollutant or a calendar date are skipped.
pub fn read_monthly_file(path: &Path, matcher: &HourColumnMatcher) -> Result<Vec<LongRecord>> {
    let df = read_string_frame(path)?;
    melt_monthly_frame(&df, path, matcher)
}

/// Melt an already loaded monthly frame
pub fn melt_monthly_frame(
    df: &DataFrame,
    path: &Path,
    matcher: &HourColumnMatcher,
) -> Result<Vec<LongRecord>> {
    let stations = string_column(df, raw_columns::STATION, path)?;
    let pollutants = string_column(df, raw_columns::POLLUTANT_CODE, path)?;
    let years = string_column(df, raw_columns::YEAR, path)?;
    let months = string_column(df, raw_columns::MONTH, path)?;
    let days = string_column(df, raw_columns::DAY, path)?;

    let mut hour_columns = Vec::new();
    for name in df.get_column_names() {
        let Some(hour) = matcher.hour_of(name.as_str()) else {
            continue;
        };
        if hour > u32::from(MAX_HOUR) {
            return Err(AqiError::invalid_format(
                path,
                format!("Hour column '{}' is out of range", name),
            ));
        }
        hour_columns.push((hour as u8, string_column(df, name.as_str(), path)?));
    }

    if hour_columns.is_empty() {
        return Err(AqiError::invalid_format(path, "No hour columns found"));
    }

    debug!(
        "Melting {} rows x {} hour columns from {}",
        df.height(),
        hour_columns.len(),
        path.display()
    );

    let mut records = Vec::with_capacity(df.height() * hour_columns.len());
    let mut skipped_rows = 0usize;
    let mut invalid_dates = 0usize;

    for row in 0..df.height() {
        let (Some(station), Some(pollutant)) = (stations.get(row), pollutants.get(row)) else {
            skipped_rows += 1;
            continue;
        };

        let Some(date) = row_date(years.get(row), months.get(row), days.get(row)) else {
            debug!("Invalid date at row {} of {}", row + 1, path.display());
            invalid_dates += 1;
            continue;
        };

        let station_code = normalize_code(station);
        let pollutant_code = normalize_code(pollutant);

        for (hour, values) in &hour_columns {
            records.push(LongRecord {
                date,
                hour: *hour,
                station_code: station_code.clone(),
                pollutant_code: pollutant_code.clone(),
                value: values.get(row).and_then(parse_number),
            });
        }
    }

    if skipped_rows > 0 {
        warn!(
            "Skipped {} rows without station or pollutant code in {}",
            skipped_rows,
            path.display()
        );
    }

    if invalid_dates > 0 {
        warn!(
            "Skipped {} rows with an invalid date in {}",
            invalid_dates,
            path.display()
        );
    }

    Ok(records)
}

fn row_date(year: Option<&str>, month: Option<&str>, day: Option<&str>) -> Option<NaiveDate> {
    let year = i32::try_from(parse_integer(year?)?).ok()?;
    let month = u32::try_from(parse_integer(month?)?).ok()?;
    let day = u32::try_from(parse_integer(day?)?).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Left-join pollutant descriptions and station metadata onto long records.
///
/// Records without a value are dropped here; unmatched codes keep the record
/// with empty metadata.
pub fn join_metadata(
    records: Vec<LongRecord>,
    pollutants: &HashMap<String, String>,
    stations: &HashMap<String, StationInfo>,
) -> Vec<Observation> {
    records
        .into_iter()
        .filter(|record| record.value.is_some())
        .map(|record| {
            let station = stations.get(&record.station_code);
            Observation {
                date: record.date,
                hour: record.hour,
                station_name: station.and_then(|s| s.name.clone()),
                latitude: station.and_then(|s| s.latitude),
                longitude: station.and_then(|s| s.longitude),
                pollutant_label: pollutants.get(&record.pollutant_code).cloned(),
                station_code: record.station_code,
                pollutant_code: record.pollutant_code,
                concentration: record.value,
            }
        })
        .collect()
}

/// Group observations by station and hour, in key order
pub fn group_by_station_hour(
    observations: &[Observation],
) -> BTreeMap<ObservationKey, Vec<&Observation>> {
    let mut groups: BTreeMap<ObservationKey, Vec<&Observation>> = BTreeMap::new();
    for observation in observations {
        groups
            .entry(ObservationKey::from(observation))
            .or_default()
            .push(observation);
    }
    groups
}

/// Pivot observations into one aggregate reading per station and hour
pub fn pivot_aggregate(observations: &[Observation]) -> Vec<AggregateAqiReading> {
    group_by_station_hour(observations)
        .into_iter()
        .map(|(key, group)| AggregateAqiReading::from_group(key, group))
        .collect()
}
