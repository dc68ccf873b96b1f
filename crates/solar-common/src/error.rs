//! Error types for the solar map crates.

use thiserror::Error;

/// Result type alias using SolarMapError.
pub type SolarMapResult<T> = Result<T, SolarMapError>;

/// Primary error type for a map run.
#[derive(Debug, Error)]
pub enum SolarMapError {
    // === Input Validation Errors ===
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Scheme not found: {0}")]
    SchemeNotFound(String),

    #[error("Invalid scheme '{name}': {message}")]
    InvalidScheme { name: String, message: String },

    // === Data Errors ===
    #[error("Failed to read input table: {0}")]
    ReadError(String),

    #[error("Input table has no rows")]
    EmptyTable,

    // === Output Errors ===
    #[error("Failed to write output: {0}")]
    WriteError(String),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl SolarMapError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            SolarMapError::MissingColumns(_) => "MissingColumns",
            SolarMapError::InvalidParameter { .. } => "InvalidParameterValue",
            SolarMapError::SchemeNotFound(_) => "SchemeNotDefined",
            SolarMapError::InvalidScheme { .. } => "InvalidScheme",
            SolarMapError::ReadError(_) => "UnreadableInput",
            SolarMapError::EmptyTable => "EmptyInput",
            SolarMapError::WriteError(_) => "UnwritableOutput",
            _ => "NoApplicableCode",
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SolarMapError::MissingColumns(_)
            | SolarMapError::InvalidParameter { .. }
            | SolarMapError::EmptyTable => 2,

            SolarMapError::SchemeNotFound(_)
            | SolarMapError::InvalidScheme { .. }
            | SolarMapError::ConfigError(_) => 3,

            SolarMapError::ReadError(_) | SolarMapError::WriteError(_) => 4,

            SolarMapError::InternalError(_) => 1,
        }
    }

    /// True when the error comes from the user's input rather than the tool.
    pub fn is_user_error(&self) -> bool {
        matches!(self.exit_code(), 2..=4)
    }
}

impl From<std::io::Error> for SolarMapError {
    fn from(err: std::io::Error) -> Self {
        SolarMapError::ReadError(err.to_string())
    }
}

impl From<serde_json::Error> for SolarMapError {
    fn from(err: serde_json::Error) -> Self {
        SolarMapError::InternalError(format!("JSON error: {}", err))
    }
}

impl From<crate::style::StyleError> for SolarMapError {
    fn from(err: crate::style::StyleError) -> Self {
        SolarMapError::ConfigError(err.to_string())
    }
}
