//! Coordinate correction for values that lost their decimal point.
//!
//! A longitude such as `-519253` is assumed to be `-51.9253` written without
//! the decimal mark. The normalizer divides by ten until the value fits the
//! axis bound, up to a configured number of divisions. The heuristic cannot
//! tell a lost decimal from a genuinely bad value: `1900` becomes `19` on
//! the longitude axis without any complaint.

use serde::{Deserialize, Serialize};
use solar_common::{Axis, AxisBounds, CellValue, DecimalSeparator, SolarMapError, SolarMapResult};

/// Largest power of ten that is exactly representable as an f64.
const MAX_EXACT_DIVISIONS: u32 = 22;

/// Normalizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Absolute bound per axis
    #[serde(default)]
    pub bounds: AxisBounds,

    /// How many times a value may be divided by ten
    #[serde(default = "default_max_divisions")]
    pub max_divisions: u32,
}

fn default_max_divisions() -> u32 {
    6
}

impl NormalizerConfig {
    /// Correction as the first versions of the tool did it: 180 on both
    /// axes and at most two divisions.
    pub fn legacy() -> Self {
        Self {
            bounds: AxisBounds::uniform(180.0),
            max_divisions: 2,
        }
    }

    pub fn validate(&self) -> SolarMapResult<()> {
        self.bounds
            .validate()
            .map_err(|message| SolarMapError::InvalidParameter {
                param: "bounds".to_string(),
                message,
            })?;

        if self.max_divisions > MAX_EXACT_DIVISIONS {
            return Err(SolarMapError::InvalidParameter {
                param: "max_divisions".to_string(),
                message: format!(
                    "must be at most {}, got {}",
                    MAX_EXACT_DIVISIONS, self.max_divisions
                ),
            });
        }

        Ok(())
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            bounds: AxisBounds::geographic(),
            max_divisions: default_max_divisions(),
        }
    }
}

/// Result of normalizing one coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalized {
    pub value: f64,

    /// Number of divisions by ten applied
    pub divisions: u32,

    /// Whether the final value is within the axis bound
    pub in_range: bool,
}

impl Normalized {
    pub fn was_corrected(&self) -> bool {
        self.divisions > 0
    }
}

/// Corrects out-of-range coordinates.
#[derive(Debug, Clone, Default)]
pub struct CoordinateNormalizer {
    config: NormalizerConfig,
}

impl CoordinateNormalizer {
    pub fn new(config: NormalizerConfig) -> SolarMapResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Divide by ten until `|value|` fits the axis bound.
    ///
    /// The k-th attempt is `value / 10^k` so that every result carries a
    /// single rounding. When the cap is reached the last attempt is returned
    /// with `in_range == false`. Non-finite input is returned untouched.
    pub fn normalize(&self, axis: Axis, value: f64) -> Normalized {
        let limit = self.config.bounds.limit(axis);

        if !value.is_finite() {
            return Normalized {
                value,
                divisions: 0,
                in_range: false,
            };
        }

        let mut divisions = 0;
        let mut corrected = value;
        while corrected.abs() > limit && divisions < self.config.max_divisions {
            divisions += 1;
            corrected = value / 10f64.powi(divisions as i32);
        }

        Normalized {
            value: corrected,
            divisions,
            in_range: corrected.abs() <= limit,
        }
    }

    /// Normalize a cell. Raw text is passed through unchanged.
    pub fn normalize_cell(&self, axis: Axis, cell: &CellValue) -> (CellValue, Option<Normalized>) {
        match cell {
            CellValue::Number(v) => {
                let normalized = self.normalize(axis, *v);
                (CellValue::Number(normalized.value), Some(normalized))
            }
            CellValue::Raw(_) => (cell.clone(), None),
        }
    }

    /// Parse and normalize cell text. Unparseable text comes back as-is.
    pub fn normalize_text(&self, axis: Axis, raw: &str, decimal: DecimalSeparator) -> CellValue {
        self.normalize_cell(axis, &CellValue::parse(raw, decimal)).0
    }
}

/// Normalize a longitude with the default settings.
pub fn normalize_longitude(value: f64) -> f64 {
    CoordinateNormalizer::default()
        .normalize(Axis::Longitude, value)
        .value
}

/// Normalize a latitude with the default settings.
pub fn normalize_latitude(value: f64) -> f64 {
    CoordinateNormalizer::default()
        .normalize(Axis::Latitude, value)
        .value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_range_passes_through() {
        let n = CoordinateNormalizer::default().normalize(Axis::Longitude, -47.5);
        assert_eq!(n.value, -47.5);
        assert_eq!(n.divisions, 0);
        assert!(n.in_range);
        assert!(!n.was_corrected());
    }

    #[test]
    fn test_cap_leaves_value_out_of_range() {
        let legacy = CoordinateNormalizer::new(NormalizerConfig::legacy()).unwrap();
        let n = legacy.normalize(Axis::Longitude, -519253.0);
        assert_eq!(n.divisions, 2);
        assert_eq!(n.value, -5192.53);
        assert!(!n.in_range);
    }

    #[test]
    fn test_non_finite_untouched() {
        let n = CoordinateNormalizer::default().normalize(Axis::Latitude, f64::INFINITY);
        assert_eq!(n.value, f64::INFINITY);
        assert_eq!(n.divisions, 0);
        assert!(!n.in_range);
    }

    #[test]
    fn test_config_validation() {
        let config = NormalizerConfig {
            max_divisions: 40,
            ..NormalizerConfig::default()
        };
        assert!(CoordinateNormalizer::new(config).is_err());
    }
}
