//! Error handling for air-quality processing operations.
//!
//! Only fatal conditions live here: unreadable files, malformed tables and bad
//! configuration. Missing or unusable measurements are data-level outcomes and
//! travel through the pipeline as `None` instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AqiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input not found at path: {path}")]
    InputNotFound { path: PathBuf },

    #[error("No files matching '{pattern}' found in: {path}")]
    NoInputFiles { path: PathBuf, pattern: String },

    #[error("Missing required column '{column}' in file: {path}")]
    MissingColumn { path: PathBuf, column: String },

    #[error("Invalid format in file: {path} - {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Date parsing failed for '{value}': {source}")]
    DateParsing {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Processing failed for file: {path} - {reason}")]
    ProcessingFailed { path: PathBuf, reason: String },

    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl AqiError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid format error for a file
    pub fn invalid_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Errors that make the whole run pointless, as opposed to a single bad input file
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AqiError::Configuration { .. }
                | AqiError::InputNotFound { .. }
                | AqiError::NoInputFiles { .. }
                | AqiError::ProcessingInterrupted { .. }
        )
    }
}

impl From<toml::de::Error> for AqiError {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid configuration file: {}", error),
        }
    }
}

pub type Result<T> = std::result::Result<T, AqiError>;
