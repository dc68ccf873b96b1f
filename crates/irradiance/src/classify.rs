//! Irradiation value classification.

use serde::{Serialize, Serializer};
use solar_common::{
    CellValue, ClassificationScheme, ClassifiedConfig, Color, DecimalSeparator, GradientConfig,
    SchemeDefinition, SolarMapError, SolarMapResult,
};
use std::fmt;

/// Display bucket a value falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Position in the ordered partition, lowest values first
    Index(usize),

    /// Value was not numeric
    Unknown,
}

impl Bucket {
    pub fn index(&self) -> Option<usize> {
        match self {
            Bucket::Index(i) => Some(*i),
            Bucket::Unknown => None,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Index(i) => write!(f, "{}", i),
            Bucket::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for Bucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Bucket::Index(i) => serializer.serialize_u64(*i as u64),
            Bucket::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

/// Outcome of classifying one value.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub bucket: Bucket,
    pub color: Color,
    pub label: String,
}

impl Classification {
    pub fn is_unknown(&self) -> bool {
        self.bucket == Bucket::Unknown
    }
}

/// Smallest and largest value seen in a table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Range over the finite values, or `None` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some(ValueRange { min: v, max: v }),
                Some(r) => Some(ValueRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                }),
            })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

#[derive(Debug, Clone)]
pub(crate) enum ClassifierKind {
    Classified(ClassifiedConfig),
    Gradient(GradientConfig),
    /// Observed ramp over an empty or single-valued range
    Flat(Color),
}

/// Maps values to buckets and colors for one scheme.
#[derive(Debug, Clone)]
pub struct Classifier {
    pub(crate) kind: ClassifierKind,
    unknown_color: Color,
}

impl Classifier {
    /// Build a classifier for a scheme.
    ///
    /// Observed ramps need the table's value range; without one (or with a
    /// zero-width one) every value gets the ramp's first color.
    pub fn from_definition(
        definition: &SchemeDefinition,
        observed: Option<ValueRange>,
    ) -> SolarMapResult<Self> {
        definition
            .validate()
            .map_err(|message| SolarMapError::InvalidScheme {
                name: definition.name.clone(),
                message,
            })?;

        let kind = match &definition.scheme {
            ClassificationScheme::Classified(c) => ClassifierKind::Classified(c.clone()),
            ClassificationScheme::Gradient(g) => ClassifierKind::Gradient(g.clone()),
            ClassificationScheme::ObservedRamp(ramp) => {
                match observed.and_then(|r| ramp.to_gradient(r.min, r.max)) {
                    Some(gradient) => ClassifierKind::Gradient(gradient),
                    None => {
                        tracing::debug!(
                            scheme = %definition.name,
                            "Observed range is empty, using a single color"
                        );
                        ClassifierKind::Flat(
                            ramp.colors
                                .first()
                                .cloned()
                                .unwrap_or_else(|| definition.unknown_color()),
                        )
                    }
                }
            }
        };

        Ok(Self {
            kind,
            unknown_color: definition.unknown_color(),
        })
    }

    /// The 4400/4550/4650 four-class scheme.
    pub fn four_bucket() -> Self {
        Self {
            kind: ClassifierKind::Classified(ClassifiedConfig::four_bucket()),
            unknown_color: Color::Hex(solar_common::UNKNOWN_COLOR.to_string()),
        }
    }

    /// Number of buckets, not counting `Unknown`.
    pub fn bucket_count(&self) -> usize {
        match &self.kind {
            ClassifierKind::Classified(c) => c.classes.len(),
            ClassifierKind::Gradient(g) => g.stops.len() + 1,
            ClassifierKind::Flat(_) => 1,
        }
    }

    pub fn unknown(&self) -> Classification {
        Classification {
            bucket: Bucket::Unknown,
            color: self.unknown_color.clone(),
            label: "unknown".to_string(),
        }
    }

    /// Classify a number. Non-finite values are `Unknown`.
    pub fn classify(&self, value: f64) -> Classification {
        if !value.is_finite() {
            return self.unknown();
        }

        match &self.kind {
            ClassifierKind::Classified(config) => match config.classify(value) {
                Some((index, class)) => Classification {
                    bucket: Bucket::Index(index),
                    color: class.color.clone(),
                    label: class.display_label(),
                },
                // Validated classes are exhaustive
                None => self.unknown(),
            },
            ClassifierKind::Gradient(gradient) => {
                let segment = gradient.segment(value);
                Classification {
                    bucket: Bucket::Index(segment),
                    color: gradient.interpolate(value),
                    label: segment_label(gradient, segment),
                }
            }
            ClassifierKind::Flat(color) => Classification {
                bucket: Bucket::Index(0),
                color: color.clone(),
                label: format_value(value),
            },
        }
    }

    pub fn classify_cell(&self, cell: &CellValue) -> Classification {
        match cell.as_f64() {
            Some(v) => self.classify(v),
            None => self.unknown(),
        }
    }

    /// Parse and classify cell text.
    pub fn classify_text(&self, raw: &str, decimal: DecimalSeparator) -> Classification {
        self.classify_cell(&CellValue::parse(raw, decimal))
    }
}

fn segment_label(gradient: &GradientConfig, segment: usize) -> String {
    let stops = &gradient.stops;
    match (segment.checked_sub(1).and_then(|i| stops.get(i)), stops.get(segment)) {
        (None, Some(high)) => format!("< {}", format_value(high.value)),
        (Some(low), Some(high)) => {
            format!("{} - {}", format_value(low.value), format_value(high.value))
        }
        (Some(low), None) => format!(">= {}", format_value(low.value)),
        (None, None) => String::new(),
    }
}

/// Integer rendering used for labels, as the legend shows whole kWh.
pub(crate) fn format_value(value: f64) -> String {
    format!("{:.0}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_range_skips_non_finite() {
        let range = ValueRange::from_values([4500.0, f64::NAN, 4200.0, 4800.0]).unwrap();
        assert_eq!(range.min, 4200.0);
        assert_eq!(range.max, 4800.0);
        assert_eq!(range.span(), 600.0);
        assert!(ValueRange::from_values(std::iter::empty()).is_none());
    }

    #[test]
    fn test_bucket_serialization() {
        assert_eq!(serde_json::to_string(&Bucket::Index(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Bucket::Unknown).unwrap(), "\"unknown\"");
    }

    #[test]
    fn test_observed_ramp_without_range_is_flat() {
        let def = SchemeDefinition::observed_ramp();
        let classifier = Classifier::from_definition(&def, None).unwrap();
        assert_eq!(classifier.bucket_count(), 1);
        let c = classifier.classify(4500.0);
        assert_eq!(c.bucket, Bucket::Index(0));
        assert_eq!(c.color.to_hex(), "#313695");
        assert_eq!(c.label, "4500");
    }

    #[test]
    fn test_gradient_segment_labels() {
        let def = SchemeDefinition::observed_ramp();
        let range = ValueRange { min: 4000.0, max: 4600.0 };
        let classifier = Classifier::from_definition(&def, Some(range)).unwrap();
        assert_eq!(classifier.bucket_count(), 8);
        assert_eq!(classifier.classify(3999.0).label, "< 4000");
        assert_eq!(classifier.classify(4050.0).label, "4000 - 4100");
        assert_eq!(classifier.classify(4600.0).label, ">= 4600");
    }
}
