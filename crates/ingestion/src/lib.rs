//! Irradiation table ingestion.
//!
//! Reads a delimited text table, checks that the configured longitude,
//! latitude and value columns exist, and returns the rows as raw text.
//! No number parsing happens here: cells that do not parse are the
//! classifier's and normalizer's business.
//!
//! # Architecture
//!
//! - Delimiter sniffing for files of unknown origin
//! - Header matching with BOM and whitespace stripped
//! - Row-level problems are collected, never fatal

pub mod config;
pub mod error;
pub mod sniff;
pub mod table;

// Re-exports
pub use config::{ColumnNames, TableConfig};
pub use error::{IngestionError, Result};
pub use sniff::sniff_delimiter;
pub use table::{IrradianceTable, RowIssue, TableReader};
