//! Daily meteorological enrichment
//!
//! Reads the XEMA daily observations, keeps precipitation and mean wind speed,
//! averages them per day across stations and left-joins them onto the
//! aggregate AQI table by date.

use super::reader::{parse_number, read_string_frame, string_column};
use crate::aqi::AggregateAqiReading;
use crate::config::MeteoVariables;
use crate::constants::{METEO_DATE_FORMAT, meteo_columns};
use crate::error::{AqiError, Result};
use crate::models::MeteoDay;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Aggregate AQI row with the day's weather attached
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedReading {
    pub reading: AggregateAqiReading,
    pub precipitation_mm: Option<f64>,
    pub wind_speed_ms: Option<f64>,
}

impl EnrichedReading {
    pub fn has_meteo(&self) -> bool {
        self.precipitation_mm.is_some() || self.wind_speed_ms.is_some()
    }
}

#[derive(Debug, Default)]
struct DailyAccumulator {
    precipitation: (f64, usize),
    wind_speed: (f64, usize),
}

fn mean((sum, count): (f64, usize)) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

/// Parse a `DATA_LECTURA` cell; a trailing time component is ignored
pub fn parse_meteo_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.split_whitespace().next().unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, METEO_DATE_FORMAT).map_err(|source| {
        AqiError::DateParsing {
            value: raw.to_string(),
            source,
        }
    })
}

/// Load the XEMA file and average the configured variables per day
pub fn load_meteo(path: &Path, variables: &MeteoVariables) -> Result<Vec<MeteoDay>> {
    let df = read_string_frame(path)?;
    let names = string_column(&df, meteo_columns::VARIABLE, path)?;
    let values = string_column(&df, meteo_columns::VALUE, path)?;
    let dates = string_column(&df, meteo_columns::DATE, path)?;

    let mut days: BTreeMap<NaiveDate, DailyAccumulator> = BTreeMap::new();
    let mut kept = 0usize;

    for ((name, value), date) in names
        .into_iter()
        .zip(values.into_iter())
        .zip(dates.into_iter())
    {
        let Some(name) = name.map(str::trim) else {
            continue;
        };

        let is_precipitation = name == variables.precipitation;
        let is_wind_speed = name == variables.wind_speed;
        if !is_precipitation && !is_wind_speed {
            continue;
        }

        let Some(date) = date else {
            continue;
        };
        let date = parse_meteo_date(date)?;
        let Some(value) = value.and_then(parse_number) else {
            continue;
        };

        let day = days.entry(date).or_default();
        let slot = if is_precipitation {
            &mut day.precipitation
        } else {
            &mut day.wind_speed
        };
        slot.0 += value;
        slot.1 += 1;
        kept += 1;
    }

    debug!(
        "Kept {} meteorological values covering {} days from {}",
        kept,
        days.len(),
        path.display()
    );

    Ok(days
        .into_iter()
        .map(|(date, acc)| MeteoDay {
            date,
            precipitation_mm: mean(acc.precipitation),
            wind_speed_ms: mean(acc.wind_speed),
        })
        .collect())
}

/// Left-join daily weather onto aggregate readings by date
pub fn join_meteo(readings: Vec<AggregateAqiReading>, days: &[MeteoDay]) -> Vec<EnrichedReading> {
    let by_date: BTreeMap<NaiveDate, &MeteoDay> = days.iter().map(|day| (day.date, day)).collect();

    readings
        .into_iter()
        .map(|reading| {
            let day = by_date.get(&reading.key.date);
            EnrichedReading {
                precipitation_mm: day.and_then(|d| d.precipitation_mm),
                wind_speed_ms: day.and_then(|d| d.wind_speed_ms),
                reading,
            }
        })
        .collect()
}
