//! CSV reading for raw and derived tables
//!
//! Every table is read with all columns as strings and converted here. The
//! source files mix integer and float encodings for the same code columns,
//! and the XEMA file uses a decimal comma, so type inference is not trusted.

use crate::constants::{
    CLEAN_DATE_FORMAT, MAX_HOUR, clean_columns, pollutant_columns, station_columns,
};
use crate::error::{AqiError, Result};
use crate::models::{Observation, StationInfo};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Read a CSV file with a header row, keeping every column as a string
pub fn read_string_frame(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(AqiError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(
        "Read {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df)
}

/// Read a derived table written as CSV or Parquet, as string columns.
///
/// Parquet columns are cast to strings so both formats go through the same
/// parsing path.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let is_parquet = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));
    if !is_parquet {
        return read_string_frame(path);
    }

    if !path.is_file() {
        return Err(AqiError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path)?;
    let df = ParquetReader::new(file).finish()?;
    let columns = df
        .get_columns()
        .iter()
        .map(|column| column.cast(&DataType::String))
        .collect::<PolarsResult<Vec<_>>>()?;

    Ok(DataFrame::new(columns)?)
}

/// Borrow a string column, mapping absence to a descriptive error
pub fn string_column<'a>(df: &'a DataFrame, name: &str, path: &Path) -> Result<&'a StringChunked> {
    let column = df.column(name).map_err(|_| AqiError::MissingColumn {
        path: path.to_path_buf(),
        column: name.to_string(),
    })?;
    Ok(column.str()?)
}

/// Borrow a string column that may legitimately be absent
pub fn optional_string_column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a StringChunked> {
    df.column(name).ok().and_then(|column| column.str().ok())
}

/// Parse a decimal number, accepting a decimal comma. Blank, unparseable and
/// NaN cells are missing values.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = trimmed.replace(',', ".");
    normalized.parse::<f64>().ok().filter(|value| !value.is_nan())
}

/// Normalize a code cell so `4`, `4.0` and ` 4 ` join to the same key
pub fn normalize_code(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => format!("{}", value as i64),
        _ => trimmed.to_string(),
    }
}

/// Parse an integer cell, tolerating a float encoding such as `2023.0`
pub fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    trimmed.parse::<i64>().ok().or_else(|| {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && value.fract() == 0.0)
            .map(|value| value as i64)
    })
}

/// Parse an ISO date, ignoring any time component after it
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);

    NaiveDate::parse_from_str(date_part, CLEAN_DATE_FORMAT).map_err(|source| {
        AqiError::DateParsing {
            value: raw.to_string(),
            source,
        }
    })
}

/// Load the pollutant dictionary: code → description
pub fn load_pollutants(path: &Path) -> Result<HashMap<String, String>> {
    let df = read_string_frame(path)?;
    let codes = string_column(&df, pollutant_columns::CODE, path)?;
    let descriptions = string_column(&df, pollutant_columns::DESCRIPTION, path)?;

    let mut pollutants = HashMap::new();
    for (code, description) in codes.into_iter().zip(descriptions.into_iter()) {
        let (Some(code), Some(description)) = (code, description) else {
            continue;
        };
        pollutants
            .entry(normalize_code(code))
            .or_insert_with(|| description.trim().to_string());
    }

    debug!("Loaded {} pollutant descriptions", pollutants.len());
    Ok(pollutants)
}

/// Load the station registry: code → metadata. The registry repeats stations
/// once per measured pollutant; the first row of each station wins.
pub fn load_stations(path: &Path) -> Result<HashMap<String, StationInfo>> {
    let df = read_string_frame(path)?;
    let codes = string_column(&df, station_columns::CODE, path)?;
    let latitudes = string_column(&df, station_columns::LATITUDE, path)?;
    let longitudes = string_column(&df, station_columns::LONGITUDE, path)?;
    let names = string_column(&df, station_columns::NAME, path)?;

    let mut stations = HashMap::new();
    for (((code, latitude), longitude), name) in codes
        .into_iter()
        .zip(latitudes.into_iter())
        .zip(longitudes.into_iter())
        .zip(names.into_iter())
    {
        let Some(code) = code else {
            continue;
        };
        let code = normalize_code(code);

        stations.entry(code.clone()).or_insert_with(|| StationInfo {
            code,
            name: name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            latitude: latitude.and_then(parse_number),
            longitude: longitude.and_then(parse_number),
        });
    }

    debug!("Loaded {} stations", stations.len());
    Ok(stations)
}

/// Read a clean long-format table written by the clean stage
pub fn read_clean_table(path: &Path) -> Result<Vec<Observation>> {
    let df = read_table(path)?;

    let dates = string_column(&df, clean_columns::DATE, path)?;
    let hours = string_column(&df, clean_columns::HOUR, path)?;
    let stations = string_column(&df, clean_columns::STATION_CODE, path)?;
    let pollutant_codes = string_column(&df, clean_columns::POLLUTANT_CODE, path)?;
    let pollutants = string_column(&df, clean_columns::POLLUTANT, path)?;
    let concentrations = string_column(&df, clean_columns::CONCENTRATION, path)?;
    let station_names = optional_string_column(&df, clean_columns::STATION_NAME);
    let latitudes = optional_string_column(&df, clean_columns::LATITUDE);
    let longitudes = optional_string_column(&df, clean_columns::LONGITUDE);

    let mut observations = Vec::with_capacity(df.height());
    let mut skipped = 0usize;

    for row in 0..df.height() {
        let (Some(date), Some(hour), Some(station)) =
            (dates.get(row), hours.get(row), stations.get(row))
        else {
            skipped += 1;
            continue;
        };

        let date = parse_iso_date(date)?;
        let hour = parse_integer(hour)
            .and_then(|h| u8::try_from(h).ok())
            .filter(|h| *h <= MAX_HOUR)
            .ok_or_else(|| {
                AqiError::invalid_format(
                    path,
                    format!("Invalid hour '{}' at row {}", hour, row + 1),
                )
            })?;

        observations.push(Observation {
            date,
            hour,
            station_code: normalize_code(station),
            station_name: station_names
                .and_then(|c| c.get(row))
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            pollutant_code: pollutant_codes.get(row).map(normalize_code).unwrap_or_default(),
            pollutant_label: pollutants.get(row).map(|p| p.to_string()),
            concentration: concentrations.get(row).and_then(parse_number),
            latitude: latitudes.and_then(|c| c.get(row)).and_then(parse_number),
            longitude: longitudes.and_then(|c| c.get(row)).and_then(parse_number),
        });
    }

    if skipped > 0 {
        warn!(
            "Skipped {} rows without date, hour or station in {}",
            skipped,
            path.display()
        );
    }

    debug!("Read {} clean observations", observations.len());
    Ok(observations)
}
