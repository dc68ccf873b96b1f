//! Geographic axes and their valid ranges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Longitude,
    Latitude,
}

impl Axis {
    /// Largest valid absolute value on this axis.
    pub fn valid_limit(&self) -> f64 {
        match self {
            Axis::Longitude => 180.0,
            Axis::Latitude => 90.0,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Longitude => write!(f, "longitude"),
            Axis::Latitude => write!(f, "latitude"),
        }
    }
}

/// Absolute bound a value must fall within on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    #[serde(default = "default_longitude_limit")]
    pub longitude: f64,

    #[serde(default = "default_latitude_limit")]
    pub latitude: f64,
}

fn default_longitude_limit() -> f64 {
    Axis::Longitude.valid_limit()
}

fn default_latitude_limit() -> f64 {
    Axis::Latitude.valid_limit()
}

impl AxisBounds {
    /// Geographic limits: 180 for longitude, 90 for latitude.
    pub fn geographic() -> Self {
        Self {
            longitude: default_longitude_limit(),
            latitude: default_latitude_limit(),
        }
    }

    /// Same limit on both axes.
    pub fn uniform(limit: f64) -> Self {
        Self {
            longitude: limit,
            latitude: limit,
        }
    }

    pub fn limit(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Longitude => self.longitude,
            Axis::Latitude => self.latitude,
        }
    }

    /// True when a bound is looser than the geographic range of its axis.
    pub fn is_looser_than_geographic(&self) -> bool {
        self.longitude > Axis::Longitude.valid_limit() || self.latitude > Axis::Latitude.valid_limit()
    }

    pub fn validate(&self) -> Result<(), String> {
        for axis in [Axis::Longitude, Axis::Latitude] {
            let limit = self.limit(axis);
            if !limit.is_finite() || limit <= 0.0 {
                return Err(format!("{} bound must be a positive number, got {}", axis, limit));
            }
        }
        Ok(())
    }
}

impl Default for AxisBounds {
    fn default() -> Self {
        Self::geographic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bounds_are_geographic() {
        let bounds = AxisBounds::default();
        assert_eq!(bounds.limit(Axis::Longitude), 180.0);
        assert_eq!(bounds.limit(Axis::Latitude), 90.0);
        assert!(!bounds.is_looser_than_geographic());
    }

    #[test]
    fn test_uniform_bounds_flag_latitude() {
        assert!(AxisBounds::uniform(180.0).is_looser_than_geographic());
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        assert!(AxisBounds::uniform(0.0).validate().is_err());
        assert!(AxisBounds::uniform(f64::NAN).validate().is_err());
        assert!(AxisBounds::geographic().validate().is_ok());
    }
}
