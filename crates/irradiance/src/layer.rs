//! Marker layer assembly: one pass over the raw rows.

use serde::{Deserialize, Serialize};
use solar_common::{
    Axis, CellValue, DecimalSeparator, LegendConfig, RawRecord, SchemeDefinition, SolarMapError,
    SolarMapResult,
};
use tracing::{debug, info, warn};

use crate::classify::{Bucket, Classification, Classifier, ValueRange};
use crate::geojson::{MarkerFeature, MarkerFeatureCollection, MarkerProperties};
use crate::legend::Legend;
use crate::normalize::{CoordinateNormalizer, Normalized, NormalizerConfig};

/// Options for turning raw rows into markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerOptions {
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    #[serde(default)]
    pub decimal: DecimalSeparator,

    /// Popup text; `{value}` is replaced with the irradiation value
    #[serde(default = "default_popup_template")]
    pub popup_template: String,
}

fn default_popup_template() -> String {
    "Irradiation: {value} kWh/m²/year".to_string()
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            normalizer: NormalizerConfig::default(),
            decimal: DecimalSeparator::default(),
            popup_template: default_popup_template(),
        }
    }
}

/// A row after normalization and classification.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRecord {
    pub line: usize,
    pub longitude: CellValue,
    pub latitude: CellValue,
    pub value: CellValue,

    /// Present when the longitude was numeric
    pub longitude_fix: Option<Normalized>,

    /// Present when the latitude was numeric
    pub latitude_fix: Option<Normalized>,

    pub classification: Classification,
    pub popup: String,
}

impl MarkerRecord {
    /// `(latitude, longitude)` when both coordinates are numeric.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.latitude.as_f64()?, self.longitude.as_f64()?))
    }

    pub fn was_corrected(&self) -> bool {
        [self.longitude_fix, self.latitude_fix]
            .iter()
            .flatten()
            .any(Normalized::was_corrected)
    }

    pub fn in_range(&self) -> bool {
        matches!(
            (self.longitude_fix, self.latitude_fix),
            (Some(lon), Some(lat)) if lon.in_range && lat.in_range
        )
    }

    pub fn to_feature(&self) -> Option<MarkerFeature> {
        let (lat, lon) = self.position()?;
        let properties = MarkerProperties {
            value: self.value.clone(),
            bucket: self.classification.bucket,
            label: self.classification.label.clone(),
            color: self.classification.color.to_hex(),
            popup: self.popup.clone(),
            corrected: self.was_corrected(),
            in_range: self.in_range(),
        };
        Some(MarkerFeature::point(lon, lat, properties).with_id(self.line.to_string()))
    }
}

/// Counts reported after a pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerSummary {
    pub total_rows: usize,

    /// Rows with numeric coordinates
    pub plotted: usize,

    /// Line numbers of rows whose coordinates are not numeric
    pub unplotted: Vec<usize>,

    /// Coordinate cells divided to fit their bound
    pub corrected_coordinates: usize,

    /// Rows with a coordinate still out of bounds after correction
    pub out_of_range: usize,

    /// Rows whose value is not numeric
    pub unknown_values: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_range: Option<ValueRange>,

    /// Rows per bucket, in legend order
    pub bucket_counts: Vec<usize>,
}

/// Result of a pass: markers, legend and summary.
#[derive(Debug, Clone)]
pub struct MarkerLayer {
    pub records: Vec<MarkerRecord>,
    pub legend: Legend,
    pub summary: LayerSummary,

    /// Mean `[latitude, longitude]` of the plotted markers
    pub center: Option<[f64; 2]>,
}

impl MarkerLayer {
    pub fn to_feature_collection(&self) -> MarkerFeatureCollection {
        MarkerFeatureCollection::new()
            .with_features(self.records.iter().filter_map(MarkerRecord::to_feature).collect())
    }
}

/// Builds marker layers for one scheme.
#[derive(Debug, Clone)]
pub struct LayerBuilder {
    normalizer: CoordinateNormalizer,
    scheme: SchemeDefinition,
    options: LayerOptions,
}

impl LayerBuilder {
    pub fn new(scheme: SchemeDefinition, options: LayerOptions) -> SolarMapResult<Self> {
        scheme
            .validate()
            .map_err(|message| SolarMapError::InvalidScheme {
                name: scheme.name.clone(),
                message,
            })?;

        let normalizer = CoordinateNormalizer::new(options.normalizer.clone())?;

        let bounds = options.normalizer.bounds;
        if bounds.is_looser_than_geographic() {
            warn!(
                longitude_bound = bounds.longitude,
                latitude_bound = bounds.latitude,
                "Coordinate bound exceeds the geographic range; corrected values may still be invalid"
            );
        }

        Ok(Self {
            normalizer,
            scheme,
            options,
        })
    }

    pub fn scheme(&self) -> &SchemeDefinition {
        &self.scheme
    }

    /// Normalize, classify and summarize every row.
    pub fn build(&self, rows: &[RawRecord]) -> SolarMapResult<MarkerLayer> {
        let decimal = self.options.decimal;
        let values: Vec<CellValue> = rows
            .iter()
            .map(|row| CellValue::parse(&row.value, decimal))
            .collect();

        let observed = ValueRange::from_values(values.iter().filter_map(CellValue::as_f64));
        let classifier = Classifier::from_definition(&self.scheme, observed)?;

        let mut summary = LayerSummary {
            total_rows: rows.len(),
            value_range: observed,
            bucket_counts: vec![0; classifier.bucket_count()],
            ..LayerSummary::default()
        };

        let mut records = Vec::with_capacity(rows.len());
        for (row, value) in rows.iter().zip(values) {
            let record = self.process_row(row, value, &classifier);
            self.tally(&record, &mut summary);
            records.push(record);
        }

        let legend_config = self.scheme.legend.clone().unwrap_or_else(LegendConfig::default);
        let legend = Legend::for_classifier(
            &classifier,
            &legend_config,
            self.scheme.units.as_deref(),
            summary.unknown_values > 0,
        );

        let center = mean_position(&records);

        info!(
            rows = summary.total_rows,
            plotted = summary.plotted,
            corrected = summary.corrected_coordinates,
            unknown = summary.unknown_values,
            scheme = %self.scheme.name,
            "Built marker layer"
        );

        Ok(MarkerLayer {
            records,
            legend,
            summary,
            center,
        })
    }

    fn process_row(&self, row: &RawRecord, value: CellValue, classifier: &Classifier) -> MarkerRecord {
        let decimal = self.options.decimal;
        let (longitude, longitude_fix) = self.normalizer.normalize_cell(
            Axis::Longitude,
            &CellValue::parse(&row.longitude, decimal),
        );
        let (latitude, latitude_fix) = self
            .normalizer
            .normalize_cell(Axis::Latitude, &CellValue::parse(&row.latitude, decimal));

        for (axis, fix) in [(Axis::Longitude, longitude_fix), (Axis::Latitude, latitude_fix)] {
            match fix {
                Some(n) if !n.in_range => warn!(
                    line = row.line,
                    %axis,
                    raw = %row.coordinate(axis),
                    value = n.value,
                    "Coordinate still out of range after correction"
                ),
                Some(n) if n.was_corrected() => debug!(
                    line = row.line,
                    %axis,
                    raw = %row.coordinate(axis),
                    corrected = n.value,
                    divisions = n.divisions,
                    "Corrected coordinate"
                ),
                _ => {}
            }
        }

        let classification = classifier.classify_cell(&value);
        if classification.is_unknown() {
            warn!(line = row.line, raw = %row.value, "Value is not numeric");
        }

        let popup = self.options.popup_template.replace("{value}", &value.to_string());

        MarkerRecord {
            line: row.line,
            longitude,
            latitude,
            value,
            longitude_fix,
            latitude_fix,
            classification,
            popup,
        }
    }

    fn tally(&self, record: &MarkerRecord, summary: &mut LayerSummary) {
        if record.position().is_some() {
            summary.plotted += 1;
            if !record.in_range() {
                summary.out_of_range += 1;
            }
        } else {
            warn!(line = record.line, "Row has a non-numeric coordinate and is not plotted");
            summary.unplotted.push(record.line);
        }

        summary.corrected_coordinates += [record.longitude_fix, record.latitude_fix]
            .iter()
            .flatten()
            .filter(|n| n.was_corrected())
            .count();

        match record.classification.bucket {
            Bucket::Index(i) => {
                if let Some(count) = summary.bucket_counts.get_mut(i) {
                    *count += 1;
                }
            }
            Bucket::Unknown => summary.unknown_values += 1,
        }
    }
}

fn mean_position(records: &[MarkerRecord]) -> Option<[f64; 2]> {
    let positions: Vec<(f64, f64)> = records.iter().filter_map(MarkerRecord::position).collect();
    if positions.is_empty() {
        return None;
    }
    let n = positions.len() as f64;
    let (lat_sum, lon_sum) = positions
        .iter()
        .fold((0.0, 0.0), |(la, lo), (lat, lon)| (la + lat, lo + lon));
    Some([lat_sum / n, lon_sum / n])
}
