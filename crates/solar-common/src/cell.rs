//! Table cell values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Character used as the decimal mark in numeric cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecimalSeparator {
    #[default]
    Point,
    Comma,
}

impl DecimalSeparator {
    pub fn as_char(&self) -> char {
        match self {
            DecimalSeparator::Point => '.',
            DecimalSeparator::Comma => ',',
        }
    }

    /// Parse a decimal separator from a user-supplied string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "." | "point" | "dot" => Some(DecimalSeparator::Point),
            "," | "comma" => Some(DecimalSeparator::Comma),
            _ => None,
        }
    }
}

/// A cell that either parsed as a finite number or is kept as raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Raw(String),
}

impl CellValue {
    /// Parse raw cell text. Anything that is not a finite number stays raw.
    pub fn parse(raw: &str, decimal: DecimalSeparator) -> Self {
        let trimmed = raw.trim();
        let candidate = match decimal {
            DecimalSeparator::Point => trimmed.to_string(),
            // "4.620,5" -> "4620.5"
            DecimalSeparator::Comma => trimmed.replace('.', "").replace(',', "."),
        };

        match candidate.parse::<f64>() {
            Ok(v) if v.is_finite() => CellValue::Number(v),
            _ => CellValue::Raw(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Raw(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) => write!(f, "{}", v),
            CellValue::Raw(s) => write!(f, "{}", s),
        }
    }
}
