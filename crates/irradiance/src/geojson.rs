//! GeoJSON types for marker output.
//!
//! Each plotted record becomes a Point feature whose properties carry the
//! value, the bucket and the display color, so any web map can style the
//! markers without knowing the classification scheme.

use serde::Serialize;

use crate::classify::Bucket;
use solar_common::CellValue;

/// A GeoJSON FeatureCollection of markers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarkerFeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    pub features: Vec<MarkerFeature>,
}

impl MarkerFeatureCollection {
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    pub fn with_features(mut self, features: Vec<MarkerFeature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for MarkerFeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A single marker.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarkerFeature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Source line number as a string id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub geometry: PointGeometry,

    pub properties: MarkerProperties,
}

impl MarkerFeature {
    pub fn point(lon: f64, lat: f64, properties: MarkerProperties) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry: PointGeometry::new(lon, lat),
            properties,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A GeoJSON Point.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PointGeometry {
    /// Type identifier (always "Point").
    #[serde(rename = "type")]
    pub type_: String,

    /// Coordinates as [longitude, latitude].
    pub coordinates: [f64; 2],
}

impl PointGeometry {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            type_: "Point".to_string(),
            coordinates: [lon, lat],
        }
    }

    pub fn lon(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }
}

/// Properties attached to each marker.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarkerProperties {
    /// Irradiation value, or the raw text when it was not numeric
    pub value: CellValue,

    pub bucket: Bucket,

    /// Bucket label for the legend
    pub label: String,

    /// CSS hex color
    pub color: String,

    /// Popup text
    pub popup: String,

    /// Whether either coordinate was divided to fit its bound
    pub corrected: bool,

    /// Whether both coordinates fit their bounds after correction
    pub in_range: bool,
}
