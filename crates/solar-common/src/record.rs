//! Raw input records.

use serde::{Deserialize, Serialize};

use crate::axis::Axis;

/// One input row as read from the table, before any parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 1-based line number in the source, header included
    pub line: usize,
    pub longitude: String,
    pub latitude: String,
    pub value: String,
}

impl RawRecord {
    pub fn new(
        line: usize,
        longitude: impl Into<String>,
        latitude: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            line,
            longitude: longitude.into(),
            latitude: latitude.into(),
            value: value.into(),
        }
    }

    pub fn coordinate(&self, axis: Axis) -> &str {
        match axis {
            Axis::Longitude => &self.longitude,
            Axis::Latitude => &self.latitude,
        }
    }
}
