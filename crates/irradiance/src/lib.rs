//! Coordinate correction and value classification for irradiation maps.
//!
//! Pure transforms with no I/O:
//! - Coordinate normalization (lost decimal point heuristic)
//! - Value classification (class breaks, gradients, observed ramps)
//! - Legend generation
//! - Marker layer assembly and GeoJSON output

pub mod classify;
pub mod geojson;
pub mod layer;
pub mod legend;
pub mod normalize;

pub use classify::{Bucket, Classification, Classifier, ValueRange};
pub use geojson::{MarkerFeature, MarkerFeatureCollection, MarkerProperties, PointGeometry};
pub use layer::{LayerBuilder, LayerOptions, LayerSummary, MarkerLayer, MarkerRecord};
pub use legend::{Legend, LegendEntry};
pub use normalize::{
    normalize_latitude, normalize_longitude, CoordinateNormalizer, Normalized, NormalizerConfig,
};
