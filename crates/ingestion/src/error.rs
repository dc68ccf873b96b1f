//! Error types for the ingestion crate.

use solar_common::SolarMapError;
use thiserror::Error;

/// Errors that can occur while loading a table.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse table: {0}")]
    Parse(String),

    #[error("Missing required columns: {}", .missing.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<csv::Error> for IngestionError {
    fn from(err: csv::Error) -> Self {
        IngestionError::Parse(err.to_string())
    }
}

impl From<IngestionError> for SolarMapError {
    fn from(err: IngestionError) -> Self {
        match err {
            IngestionError::MissingColumns { missing, .. } => SolarMapError::MissingColumns(missing),
            IngestionError::InvalidConfig(message) => SolarMapError::InvalidParameter {
                param: "table".to_string(),
                message,
            },
            other => SolarMapError::ReadError(other.to_string()),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
