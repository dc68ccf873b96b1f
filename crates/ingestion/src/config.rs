//! Table layout configuration.
//!
//! Uploads come from different spreadsheet exports, so column names,
//! delimiter and decimal mark are all configurable.

use serde::{Deserialize, Serialize};
use solar_common::DecimalSeparator;

use crate::error::{IngestionError, Result};

/// Delimiters tried when none is configured.
pub const SNIFF_CANDIDATES: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Names of the required columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnNames {
    #[serde(default = "default_longitude")]
    pub longitude: String,

    #[serde(default = "default_latitude")]
    pub latitude: String,

    #[serde(default = "default_value")]
    pub value: String,
}

fn default_longitude() -> String {
    "LON".to_string()
}
fn default_latitude() -> String {
    "LAT".to_string()
}
fn default_value() -> String {
    "ANNUAL".to_string()
}

impl ColumnNames {
    pub fn new(
        longitude: impl Into<String>,
        latitude: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            longitude: longitude.into(),
            latitude: latitude.into(),
            value: value.into(),
        }
    }

    /// In the order longitude, latitude, value.
    pub fn as_array(&self) -> [&str; 3] {
        [&self.longitude, &self.latitude, &self.value]
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            longitude: default_longitude(),
            latitude: default_latitude(),
            value: default_value(),
        }
    }
}

/// How to read an input table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub columns: ColumnNames,

    /// Field delimiter; sniffed from the content when unset
    #[serde(default)]
    pub delimiter: Option<char>,

    #[serde(default)]
    pub decimal: DecimalSeparator,

    /// Match header names ignoring ASCII case
    #[serde(default)]
    pub case_insensitive_headers: bool,
}

impl TableConfig {
    pub fn validate(&self) -> Result<()> {
        for name in self.columns.as_array() {
            if name.trim().is_empty() {
                return Err(IngestionError::InvalidConfig(
                    "column names must not be empty".to_string(),
                ));
            }
        }

        let [lon, lat, value] = self.columns.as_array();
        if lon == lat || lon == value || lat == value {
            return Err(IngestionError::InvalidConfig(format!(
                "column names must be distinct, got {}, {}, {}",
                lon, lat, value
            )));
        }

        if let Some(delimiter) = self.delimiter {
            self.delimiter_byte(delimiter)?;
            if delimiter == self.decimal.as_char() && delimiter != ',' {
                return Err(IngestionError::InvalidConfig(format!(
                    "delimiter {:?} clashes with the decimal separator",
                    delimiter
                )));
            }
        }

        Ok(())
    }

    /// The configured delimiter as a byte, if set.
    pub fn delimiter(&self) -> Result<Option<u8>> {
        self.delimiter.map(|d| self.delimiter_byte(d)).transpose()
    }

    fn delimiter_byte(&self, delimiter: char) -> Result<u8> {
        if delimiter.is_ascii() && !delimiter.is_ascii_alphanumeric() && delimiter != '"' {
            Ok(delimiter as u8)
        } else {
            Err(IngestionError::InvalidConfig(format!(
                "unsupported delimiter {:?}",
                delimiter
            )))
        }
    }
}
