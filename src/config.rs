//! Configuration management and validation.
//!
//! Settings come from three layers: built-in defaults, an optional TOML file
//! and command-line flags, applied in that order.

use crate::constants::{
    MAX_DEFAULT_WORKERS, MAX_WORKERS, METEO_FILE_PATTERN, METEO_PRECIPITATION_VARIABLE,
    METEO_WIND_SPEED_VARIABLE, MONTHLY_FILE_PATTERN, POLLUTANTS_FILE, STATIONS_FILE,
};
use crate::error::{AqiError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Output table format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Comma-separated text, readable by any spreadsheet
    Csv,
    /// Snappy-compressed Parquet
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// XEMA variable names kept by the meteo stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteoVariables {
    pub precipitation: String,
    pub wind_speed: String,
}

impl Default for MeteoVariables {
    fn default() -> Self {
        Self {
            precipitation: METEO_PRECIPITATION_VARIABLE.to_string(),
            wind_speed: METEO_WIND_SPEED_VARIABLE.to_string(),
        }
    }
}

/// Global configuration for air-quality processing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AqiConfig {
    /// Number of monthly files read concurrently
    pub workers: usize,

    /// Glob matched against monthly file names
    pub monthly_file_pattern: String,

    /// Pollutant dictionary file name, relative to the input directory
    pub pollutants_file: String,

    /// Station registry file name, relative to the input directory
    pub stations_file: String,

    /// Glob used to find the XEMA file when none is given explicitly
    pub meteo_file_pattern: String,

    pub meteo_variables: MeteoVariables,

    pub output_format: OutputFormat,

    /// Drop rows whose AQI could not be computed before writing
    pub drop_missing_aqi: bool,

    /// Show progress bars while reading files
    pub show_progress: bool,
}

impl Default for AqiConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().clamp(1, MAX_DEFAULT_WORKERS),
            monthly_file_pattern: MONTHLY_FILE_PATTERN.to_string(),
            pollutants_file: POLLUTANTS_FILE.to_string(),
            stations_file: STATIONS_FILE.to_string(),
            meteo_file_pattern: METEO_FILE_PATTERN.to_string(),
            meteo_variables: MeteoVariables::default(),
            output_format: OutputFormat::Csv,
            drop_missing_aqi: true,
            show_progress: true,
        }
    }
}

impl AqiConfig {
    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AqiError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AqiConfig = toml::from_str(&contents)?;
        debug!("Loaded configuration from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(AqiError::configuration(
                "Number of workers must be greater than 0",
            ));
        }

        if self.workers > MAX_WORKERS {
            return Err(AqiError::configuration(format!(
                "Number of workers cannot exceed {}",
                MAX_WORKERS
            )));
        }

        for (name, pattern) in [
            ("monthly_file_pattern", &self.monthly_file_pattern),
            ("meteo_file_pattern", &self.meteo_file_pattern),
        ] {
            glob::Pattern::new(pattern).map_err(|e| {
                AqiError::configuration(format!("Invalid {} '{}': {}", name, pattern, e))
            })?;
        }

        if self.pollutants_file.trim().is_empty() || self.stations_file.trim().is_empty() {
            return Err(AqiError::configuration(
                "Lookup file names cannot be empty",
            ));
        }

        if self.meteo_variables.precipitation.trim().is_empty()
            || self.meteo_variables.wind_speed.trim().is_empty()
        {
            return Err(AqiError::configuration(
                "Meteorological variable names cannot be empty",
            ));
        }

        Ok(())
    }

    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the output table format
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Enable or disable progress bars
    pub fn with_show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Keep rows without an AQI in the output
    pub fn keeping_missing_aqi(mut self) -> Self {
        self.drop_missing_aqi = false;
        self
    }

    /// Set the glob used to find monthly files
    pub fn with_monthly_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.monthly_file_pattern = pattern.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = AqiConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.workers >= 1 && config.workers <= MAX_DEFAULT_WORKERS);
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert!(config.drop_missing_aqi);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = AqiConfig::default().with_workers(0);
        assert!(matches!(
            config.validate(),
            Err(AqiError::Configuration { .. })
        ));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let config = AqiConfig::default().with_monthly_file_pattern("[unclosed");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = AqiConfig::default()
            .with_workers(3)
            .with_output_format(OutputFormat::Parquet)
            .with_show_progress(false)
            .keeping_missing_aqi();

        assert_eq!(config.workers, 3);
        assert_eq!(config.output_format.extension(), "parquet");
        assert!(!config.show_progress);
        assert!(!config.drop_missing_aqi);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("aqi.toml");
        std::fs::write(
            &path,
            r#"
workers = 2
output_format = "parquet"

[meteo_variables]
wind_speed = "Velocitat del vent"
"#,
        )
        .unwrap();

        let config = AqiConfig::from_file(&path).unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.output_format, OutputFormat::Parquet);
        assert_eq!(config.meteo_variables.wind_speed, "Velocitat del vent");
        assert_eq!(
            config.meteo_variables.precipitation,
            METEO_PRECIPITATION_VARIABLE
        );
        assert_eq!(config.stations_file, STATIONS_FILE);
    }

    #[test]
    fn test_malformed_toml_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.toml");
        std::fs::write(&path, "workers = [").unwrap();

        assert!(matches!(
            AqiConfig::from_file(&path),
            Err(AqiError::Configuration { .. })
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let result = AqiConfig::from_file(Path::new("/nonexistent/aqi.toml"));
        assert!(matches!(result, Err(AqiError::InputNotFound { .. })));
    }
}
