//! Table writing for derived datasets
//!
//! Builds Polars frames from typed records and writes them as CSV or
//! Snappy-compressed Parquet. Missing values become nulls (empty CSV cells),
//! never zeros, and reals are written at full precision.

use super::meteo::EnrichedReading;
use crate::aqi::{AggregateAqiReading, AqiReading, PollutantKey};
use crate::config::OutputFormat;
use crate::constants::{CLEAN_DATE_FORMAT, aqi_columns, clean_columns};
use crate::error::{AqiError, Result};
use crate::models::Observation;

use polars::prelude::{
    Column, CsvWriter, DataFrame, ParquetCompression, ParquetWriter as PolarsParquetWriter,
    SerWriter,
};
use std::fs::File;
use std::path::PathBuf;
use tracing::debug;

/// Writes derived tables into an output directory
#[derive(Debug, Clone)]
pub struct TableWriter {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl TableWriter {
    pub fn new(output_dir: PathBuf, format: OutputFormat) -> Self {
        Self { output_dir, format }
    }

    /// Output path for a file stem in the configured format
    pub fn output_path(&self, stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", stem, self.format.extension()))
    }

    /// Write a frame under `stem`, creating the output directory if needed
    pub fn write_frame(&self, stem: &str, mut df: DataFrame) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_path(stem);
        let file = File::create(&path)?;

        match self.format {
            OutputFormat::Csv => {
                let mut file = file;
                CsvWriter::new(&mut file)
                    .include_header(true)
                    .finish(&mut df)
                    .map_err(|e| AqiError::ProcessingFailed {
                        path: path.clone(),
                        reason: format!("Failed to write CSV: {}", e),
                    })?;
            }
            OutputFormat::Parquet => {
                PolarsParquetWriter::new(file)
                    .with_compression(ParquetCompression::Snappy)
                    .finish(&mut df)
                    .map_err(|e| AqiError::ProcessingFailed {
                        path: path.clone(),
                        reason: format!("Failed to write parquet: {}", e),
                    })?;
            }
        }

        debug!("Wrote {} rows to {}", df.height(), path.display());
        Ok(path)
    }
}

fn format_date(date: chrono::NaiveDate) -> String {
    date.format(CLEAN_DATE_FORMAT).to_string()
}

/// Sub-index column name for a pollutant, e.g. `AQI_PM2.5`
pub fn sub_index_column(pollutant: PollutantKey) -> String {
    format!("{}{}", aqi_columns::SUB_INDEX_PREFIX, pollutant.as_str())
}

/// Columns shared by the clean and individual tables
fn observation_columns<'a, I>(observations: I) -> Vec<Column>
where
    I: IntoIterator<Item = &'a Observation>,
    I::IntoIter: Clone,
{
    let rows = observations.into_iter();

    let dates: Vec<String> = rows.clone().map(|o| format_date(o.date)).collect();
    let hours: Vec<i32> = rows.clone().map(|o| i32::from(o.hour)).collect();
    let station_codes: Vec<String> = rows.clone().map(|o| o.station_code.clone()).collect();
    let station_names: Vec<Option<String>> = rows.clone().map(|o| o.station_name.clone()).collect();
    let pollutant_codes: Vec<String> = rows.clone().map(|o| o.pollutant_code.clone()).collect();
    let pollutants: Vec<Option<String>> = rows.clone().map(|o| o.pollutant_label.clone()).collect();
    let concentrations: Vec<Option<f64>> = rows.clone().map(|o| o.concentration).collect();
    let latitudes: Vec<Option<f64>> = rows.clone().map(|o| o.latitude).collect();
    let longitudes: Vec<Option<f64>> = rows.map(|o| o.longitude).collect();

    vec![
        Column::new(clean_columns::DATE.into(), dates),
        Column::new(clean_columns::HOUR.into(), hours),
        Column::new(clean_columns::STATION_CODE.into(), station_codes),
        Column::new(clean_columns::STATION_NAME.into(), station_names),
        Column::new(clean_columns::POLLUTANT_CODE.into(), pollutant_codes),
        Column::new(clean_columns::POLLUTANT.into(), pollutants),
        Column::new(clean_columns::CONCENTRATION.into(), concentrations),
        Column::new(clean_columns::LATITUDE.into(), latitudes),
        Column::new(clean_columns::LONGITUDE.into(), longitudes),
    ]
}

/// Clean long table: one row per station, pollutant and hour
pub fn clean_frame(observations: &[Observation]) -> Result<DataFrame> {
    Ok(DataFrame::new(observation_columns(observations.iter()))?)
}

/// Individual table: clean columns plus key, sub-index and category
pub fn individual_frame(readings: &[AqiReading]) -> Result<DataFrame> {
    let mut columns = observation_columns(readings.iter().map(|r| &r.observation));

    let keys: Vec<Option<String>> = readings
        .iter()
        .map(|r| r.pollutant_key.map(|k| k.as_str().to_string()))
        .collect();
    let indices: Vec<Option<f64>> = readings.iter().map(|r| r.sub_index).collect();
    let categories: Vec<String> = readings
        .iter()
        .map(|r| r.category.label().to_string())
        .collect();

    columns.push(Column::new(aqi_columns::POLLUTANT_KEY.into(), keys));
    columns.push(Column::new(aqi_columns::INDIVIDUAL_AQI.into(), indices));
    columns.push(Column::new(aqi_columns::CATEGORY.into(), categories));

    Ok(DataFrame::new(columns)?)
}

fn aggregate_columns<'a, I>(readings: I) -> Vec<Column>
where
    I: IntoIterator<Item = &'a AggregateAqiReading>,
    I::IntoIter: Clone,
{
    let rows = readings.into_iter();

    let mut columns = vec![
        Column::new(
            clean_columns::DATE.into(),
            rows.clone().map(|r| format_date(r.key.date)).collect::<Vec<_>>(),
        ),
        Column::new(
            clean_columns::HOUR.into(),
            rows.clone().map(|r| i32::from(r.key.hour)).collect::<Vec<_>>(),
        ),
        Column::new(
            clean_columns::STATION_CODE.into(),
            rows.clone()
                .map(|r| r.key.station_code.clone())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            clean_columns::STATION_NAME.into(),
            rows.clone()
                .map(|r| r.station_name.clone())
                .collect::<Vec<Option<String>>>(),
        ),
        Column::new(
            clean_columns::LATITUDE.into(),
            rows.clone().map(|r| r.latitude).collect::<Vec<_>>(),
        ),
        Column::new(
            clean_columns::LONGITUDE.into(),
            rows.clone().map(|r| r.longitude).collect::<Vec<_>>(),
        ),
    ];

    for pollutant in PollutantKey::ALL {
        columns.push(Column::new(
            pollutant.as_str().into(),
            rows.clone()
                .map(|r| r.concentrations.get(&pollutant).copied())
                .collect::<Vec<_>>(),
        ));
    }

    for pollutant in PollutantKey::ALL {
        columns.push(Column::new(
            sub_index_column(pollutant).into(),
            rows.clone()
                .map(|r| r.sub_indices.get(&pollutant).copied())
                .collect::<Vec<_>>(),
        ));
    }

    columns.push(Column::new(
        aqi_columns::AQI.into(),
        rows.clone().map(|r| r.overall_aqi).collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        aqi_columns::CATEGORY.into(),
        rows.map(|r| r.category.label().to_string())
            .collect::<Vec<_>>(),
    ));

    columns
}

/// Aggregate table: one row per station and hour
pub fn aggregate_frame(readings: &[AggregateAqiReading]) -> Result<DataFrame> {
    Ok(DataFrame::new(aggregate_columns(readings.iter()))?)
}

/// Aggregate table with precipitation and wind speed appended
pub fn enriched_frame(readings: &[EnrichedReading]) -> Result<DataFrame> {
    let mut columns = aggregate_columns(readings.iter().map(|r| &r.reading));

    columns.push(Column::new(
        aqi_columns::PRECIPITATION.into(),
        readings
            .iter()
            .map(|r| r.precipitation_mm)
            .collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        aqi_columns::WIND_SPEED.into(),
        readings.iter().map(|r| r.wind_speed_ms).collect::<Vec<_>>(),
    ));

    Ok(DataFrame::new(columns)?)
}
