//! Legend generation for a classifier.

use serde::Serialize;
use solar_common::LegendConfig;

use crate::classify::{format_value, Bucket, Classifier, ClassifierKind};

const DEFAULT_TITLE: &str = "Annual irradiation";

/// One legend row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,

    /// CSS hex color
    pub color: String,

    pub bucket: Bucket,
}

/// Ordered legend, lowest values first, `unknown` last when present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Build the legend for a classifier.
    ///
    /// Classified schemes get one row per class. Gradients get `steps + 1`
    /// evenly spaced rows between their first and last stop, unless the
    /// stops carry their own labels, in which case one row per stop.
    pub fn for_classifier(
        classifier: &Classifier,
        config: &LegendConfig,
        units: Option<&str>,
        include_unknown: bool,
    ) -> Self {
        let mut entries: Vec<LegendEntry> = match &classifier.kind {
            ClassifierKind::Classified(c) => c
                .classes
                .iter()
                .enumerate()
                .map(|(i, class)| LegendEntry {
                    label: class.display_label(),
                    color: class.color.to_hex(),
                    bucket: Bucket::Index(i),
                })
                .collect(),
            ClassifierKind::Gradient(g) if g.stops.iter().all(|s| s.label.is_some()) => g
                .stops
                .iter()
                .map(|stop| LegendEntry {
                    label: stop.label.clone().unwrap_or_default(),
                    color: stop.color.to_hex(),
                    bucket: Bucket::Index(g.segment(stop.value)),
                })
                .collect(),
            ClassifierKind::Gradient(g) => {
                let (min, max) = match (g.stops.first(), g.stops.last()) {
                    (Some(first), Some(last)) => (first.value, last.value),
                    _ => (0.0, 0.0),
                };
                let steps = config.steps.max(1);
                (0..=steps)
                    .map(|i| {
                        let value = min + i as f64 * (max - min) / steps as f64;
                        LegendEntry {
                            label: format_value(value),
                            color: g.interpolate(value).to_hex(),
                            bucket: Bucket::Index(g.segment(value)),
                        }
                    })
                    .collect()
            }
            ClassifierKind::Flat(color) => vec![LegendEntry {
                label: "all values".to_string(),
                color: color.to_hex(),
                bucket: Bucket::Index(0),
            }],
        };

        if include_unknown {
            let unknown = classifier.unknown();
            entries.push(LegendEntry {
                label: unknown.label,
                color: unknown.color.to_hex(),
                bucket: Bucket::Unknown,
            });
        }

        Self {
            title: config
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            units: units.map(str::to_string),
            entries,
        }
    }

    fn heading(&self) -> String {
        match &self.units {
            Some(units) => format!("{} ({})", self.title, units),
            None => self.title.clone(),
        }
    }

    /// Plain-text table with aligned columns.
    pub fn render_table(&self) -> String {
        let width = self
            .entries
            .iter()
            .map(|e| e.label.chars().count())
            .chain(std::iter::once("Range".len()))
            .max()
            .unwrap_or(0);

        let mut out = format!("{}\n", self.heading());
        out.push_str(&format!("{:<width$}  Color\n", "Range", width = width));
        out.push_str(&format!("{}  -------\n", "-".repeat(width)));
        for entry in &self.entries {
            let padding = width - entry.label.chars().count();
            out.push_str(&format!(
                "{}{}  {}\n",
                entry.label,
                " ".repeat(padding),
                entry.color
            ));
        }
        out
    }

    /// Markdown table.
    pub fn render_markdown(&self) -> String {
        let mut out = format!("**{}**\n\n| Range | Color |\n|---|---|\n", self.heading());
        for entry in &self.entries {
            out.push_str(&format!("| {} | `{}` |\n", entry.label, entry.color));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_alignment() {
        let legend = Legend::for_classifier(
            &Classifier::four_bucket(),
            &LegendConfig::default(),
            Some("kWh/m²/year"),
            false,
        );
        let table = legend.render_table();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Annual irradiation (kWh/m²/year)");
        assert_eq!(lines.len(), 3 + 4);
        assert_eq!(lines[3], "< 4400       #008000");
        assert_eq!(lines[6], ">= 4650      #ff0000");
    }

    #[test]
    fn test_markdown_rows() {
        let legend =
            Legend::for_classifier(&Classifier::four_bucket(), &LegendConfig::default(), None, true);
        let md = legend.render_markdown();
        assert!(md.starts_with("**Annual irradiation**"));
        assert!(md.contains("| 4550 - 4650 | `#ffa500` |"));
        assert!(md.trim_end().ends_with("| unknown | `#808080` |"));
    }
}
