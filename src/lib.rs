//! Barcelona Air-Quality Processor Library
//!
//! Turns the monthly air-quality files published by the Barcelona open-data
//! portal into analysis-ready tables scored with an Air Quality Index.
//!
//! This library provides tools for:
//! - Melting wide monthly files (one column per hour) into a long table
//! - Classifying raw pollutant labels into NO2, PM10, O3 and PM2.5
//! - Piecewise-linear AQI interpolation with open-ended top segments
//! - Health categories and worst-pollutant aggregation per station and hour
//! - Joining daily XEMA precipitation and wind speed onto the AQI table
//! - Writing CSV or Snappy-compressed Parquet output

pub mod aqi;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod processor;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

pub use aqi::{
    AggregateAqiReading, AqiReading, Category, PollutantKey, categorize, classify, interpolate,
    resolve,
};
pub use config::{AqiConfig, OutputFormat};
pub use error::{AqiError, Result};
pub use models::{ComputationMode, Observation, ProcessingStats};
pub use processor::AirQualityProcessor;
