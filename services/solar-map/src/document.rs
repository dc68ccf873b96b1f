//! The map document written at the end of a run.

use chrono::{DateTime, Utc};
use irradiance::{LayerSummary, Legend, MarkerFeatureCollection, MarkerLayer};
use serde::Serialize;
use solar_common::SolarMapResult;

/// A rendered map: markers as GeoJSON plus what a viewer needs to draw them.
#[derive(Debug, Clone, Serialize)]
pub struct MapDocument {
    pub generated_at: DateTime<Utc>,

    /// Input file name, `None` for stdin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub scheme: String,

    /// `[latitude, longitude]` to center the view on
    pub center: Option<[f64; 2]>,

    pub summary: LayerSummary,
    pub legend: Legend,
    pub features: MarkerFeatureCollection,
}

impl MapDocument {
    pub fn from_layer(layer: &MarkerLayer, scheme: &str, source: Option<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            source,
            scheme: scheme.to_string(),
            center: layer.center,
            summary: layer.summary.clone(),
            legend: layer.legend.clone(),
            features: layer.to_feature_collection(),
        }
    }

    pub fn to_json(&self, pretty: bool) -> SolarMapResult<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}
