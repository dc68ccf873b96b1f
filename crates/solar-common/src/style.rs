//! Classification schemes for irradiation values.
//!
//! This module defines a JSON/YAML configuration schema describing how
//! annual irradiation readings are mapped to display colors: discrete
//! class breaks, fixed-value gradients, or a ramp stretched over the
//! observed value range.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Color used for values that could not be read as numbers.
pub const UNKNOWN_COLOR: &str = "#808080";

/// Blue to red ramp used by the gradient presets.
pub const BLUE_RED_RAMP: [&str; 7] = [
    "#313695", "#4575b4", "#74add1", "#fee090", "#fdae61", "#f46d43", "#d73027",
];

/// Root scheme configuration - can contain multiple named schemes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeConfig {
    /// Version of the scheme schema
    #[serde(default = "default_version")]
    pub version: String,

    /// Named scheme definitions
    pub schemes: HashMap<String, SchemeDefinition>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl SchemeConfig {
    /// Load scheme configuration from a JSON or YAML file, chosen by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StyleError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| StyleError::IoError(e.to_string()))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Parse scheme configuration from JSON string.
    pub fn from_json(json: &str) -> Result<Self, StyleError> {
        serde_json::from_str(json).map_err(|e| StyleError::ParseError(e.to_string()))
    }

    /// Parse scheme configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, StyleError> {
        serde_yaml::from_str(yaml).map_err(|e| StyleError::ParseError(e.to_string()))
    }

    /// The built-in schemes: `four_bucket`, `five_bucket`, `seven_bucket`
    /// and `observed_ramp`.
    pub fn builtin() -> Self {
        let schemes = [
            ("four_bucket", SchemeDefinition::four_bucket()),
            ("five_bucket", SchemeDefinition::five_bucket()),
            ("seven_bucket", SchemeDefinition::seven_bucket()),
            ("observed_ramp", SchemeDefinition::observed_ramp()),
        ]
        .into_iter()
        .map(|(name, def)| (name.to_string(), def))
        .collect();

        Self {
            version: default_version(),
            schemes,
        }
    }

    /// Add schemes from another config, replacing any with the same name.
    pub fn merge(mut self, other: SchemeConfig) -> Self {
        self.schemes.extend(other.schemes);
        self
    }

    /// Get a scheme by name.
    pub fn get(&self, name: &str) -> Option<&SchemeDefinition> {
        self.schemes.get(name)
    }

    /// Scheme names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Validate all schemes in the configuration.
    pub fn validate(&self) -> Result<(), StyleError> {
        for (name, scheme) in &self.schemes {
            scheme
                .validate()
                .map_err(|e| StyleError::ValidationError(format!("{}: {}", name, e)))?;
        }
        Ok(())
    }
}

/// A complete scheme definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeDefinition {
    /// Human-readable name
    pub name: String,

    /// Description of the scheme
    #[serde(default)]
    pub description: String,

    /// How values map to colors
    #[serde(flatten)]
    pub scheme: ClassificationScheme,

    /// Optional legend configuration
    #[serde(default)]
    pub legend: Option<LegendConfig>,

    /// Unit label for display
    #[serde(default)]
    pub units: Option<String>,

    /// Color for values that are not numeric
    #[serde(default)]
    pub unknown_color: Option<Color>,
}

impl SchemeDefinition {
    pub fn validate(&self) -> Result<(), String> {
        self.scheme.validate()
    }

    pub fn unknown_color(&self) -> Color {
        self.unknown_color
            .clone()
            .unwrap_or_else(|| Color::Hex(UNKNOWN_COLOR.to_string()))
    }

    /// Thresholds 4400/4550/4650 with green, yellow, orange and red.
    pub fn four_bucket() -> Self {
        Self::classified("Irradiation (4 classes)", ClassifiedConfig::four_bucket())
    }

    /// Thresholds 4000/4200/4400/4600 on a blue to red ramp.
    pub fn five_bucket() -> Self {
        let colors = [0, 2, 3, 5, 6].map(|i| Color::Hex(BLUE_RED_RAMP[i].to_string()));
        Self::classified(
            "Irradiation (5 classes)",
            ClassifiedConfig::from_thresholds(&[4000.0, 4200.0, 4400.0, 4600.0], &colors),
        )
    }

    /// Thresholds 3800/4100/4400/4700/5000/5400 on a blue to red ramp.
    pub fn seven_bucket() -> Self {
        let colors = BLUE_RED_RAMP.map(|c| Color::Hex(c.to_string()));
        Self::classified(
            "Irradiation (7 classes)",
            ClassifiedConfig::from_thresholds(
                &[3800.0, 4100.0, 4400.0, 4700.0, 5000.0, 5400.0],
                &colors,
            ),
        )
    }

    /// Blue to red ramp stretched over the observed min/max.
    pub fn observed_ramp() -> Self {
        Self {
            name: "Irradiation (observed range)".to_string(),
            description: "Continuous ramp between the lowest and highest value in the table"
                .to_string(),
            scheme: ClassificationScheme::ObservedRamp(ObservedRampConfig {
                colors: BLUE_RED_RAMP.iter().map(|c| Color::Hex(c.to_string())).collect(),
                interpolation: Interpolation::Linear,
            }),
            legend: Some(LegendConfig::default()),
            units: Some(default_units()),
            unknown_color: None,
        }
    }

    fn classified(name: &str, config: ClassifiedConfig) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            scheme: ClassificationScheme::Classified(config),
            legend: Some(LegendConfig::default()),
            units: Some(default_units()),
            unknown_color: None,
        }
    }
}

fn default_units() -> String {
    "kWh/m²/year".to_string()
}

/// How a value is turned into a color.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassificationScheme {
    /// Discrete color classification
    Classified(ClassifiedConfig),

    /// Continuous gradient between fixed values
    Gradient(GradientConfig),

    /// Continuous gradient stretched over the observed range
    ObservedRamp(ObservedRampConfig),
}

impl ClassificationScheme {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ClassificationScheme::Classified(c) => c.validate(),
            ClassificationScheme::Gradient(g) => g.validate(),
            ClassificationScheme::ObservedRamp(r) => r.validate(),
        }
    }
}

/// Continuous gradient color mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientConfig {
    /// Color stops defining the gradient
    pub stops: Vec<ColorStop>,

    /// How to interpolate between stops
    #[serde(default)]
    pub interpolation: Interpolation,
}

impl GradientConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.stops.len() < 2 {
            return Err("Gradient must have at least 2 color stops".to_string());
        }

        for stop in &self.stops {
            if !stop.value.is_finite() {
                return Err("Color stop values must be finite".to_string());
            }
        }

        // Check stops are in ascending order
        for i in 1..self.stops.len() {
            if self.stops[i].value <= self.stops[i - 1].value {
                return Err("Color stops must be in ascending value order".to_string());
            }
        }

        Ok(())
    }

    /// Interpolate color for a given value, clamping outside the stops.
    pub fn interpolate(&self, value: f64) -> Color {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Color::transparent(),
        };

        if value <= first.value {
            return first.color.clone();
        }
        if value >= last.value {
            return last.color.clone();
        }

        // Find bracketing stops
        for pair in self.stops.windows(2) {
            let (low, high) = (&pair[0], &pair[1]);
            if value < high.value {
                let t = (value - low.value) / (high.value - low.value);
                return low.color.lerp(&high.color, t, &self.interpolation);
            }
        }

        last.color.clone()
    }

    /// Index of the half-open segment holding `value`: the number of stops
    /// whose value is `<= value`.
    pub fn segment(&self, value: f64) -> usize {
        self.stops.iter().take_while(|s| s.value <= value).count()
    }
}

/// A color stop in a gradient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorStop {
    /// The data value at this stop
    pub value: f64,

    /// The color at this stop
    pub color: Color,

    /// Optional label for legend
    #[serde(default)]
    pub label: Option<String>,
}

/// Ramp of evenly spaced colors whose end points come from the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservedRampConfig {
    /// Colors from lowest to highest value
    pub colors: Vec<Color>,

    #[serde(default)]
    pub interpolation: Interpolation,
}

impl ObservedRampConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.colors.len() < 2 {
            return Err("Observed ramp must have at least 2 colors".to_string());
        }
        Ok(())
    }

    /// Spread the colors evenly between `min` and `max`.
    ///
    /// Returns `None` when the range is empty or not finite.
    pub fn to_gradient(&self, min: f64, max: f64) -> Option<GradientConfig> {
        if !(min.is_finite() && max.is_finite() && max > min) || self.colors.len() < 2 {
            return None;
        }

        let last = (self.colors.len() - 1) as f64;
        let stops = self
            .colors
            .iter()
            .enumerate()
            .map(|(i, color)| ColorStop {
                value: min + (max - min) * i as f64 / last,
                color: color.clone(),
                label: None,
            })
            .collect();

        Some(GradientConfig {
            stops,
            interpolation: self.interpolation.clone(),
        })
    }
}

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Hex string: "#RRGGBB" or "#RRGGBBAA"
    Hex(String),

    /// RGB array: [r, g, b] or [r, g, b, a]
    Array(Vec<u8>),

    /// Named color
    Named(String),

    /// Explicit RGBA
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl Color {
    pub fn transparent() -> Self {
        Color::Rgba {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert to RGBA tuple.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        match self {
            // Untagged strings always land here, so plain names are accepted too
            Color::Hex(s) if s.starts_with('#') => parse_hex_color(s),
            Color::Hex(s) | Color::Named(s) => named_color(s),
            Color::Array(arr) => {
                let r = arr.first().copied().unwrap_or(0);
                let g = arr.get(1).copied().unwrap_or(0);
                let b = arr.get(2).copied().unwrap_or(0);
                let a = arr.get(3).copied().unwrap_or(255);
                (r, g, b, a)
            }
            Color::Rgba { r, g, b, a } => (*r, *g, *b, *a),
        }
    }

    /// CSS hex form: "#rrggbb", or "#rrggbbaa" when not fully opaque.
    pub fn to_hex(&self) -> String {
        let (r, g, b, a) = self.to_rgba();
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Linear interpolation between two colors.
    pub fn lerp(&self, other: &Color, t: f64, interp: &Interpolation) -> Color {
        let (r1, g1, b1, a1) = self.to_rgba();
        let (r2, g2, b2, a2) = other.to_rgba();

        let t = t.clamp(0.0, 1.0);

        let lerp_u8 = |a: u8, b: u8, t: f64| -> u8 {
            ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8
        };

        match interp {
            Interpolation::Linear => Color::Rgba {
                r: lerp_u8(r1, r2, t),
                g: lerp_u8(g1, g2, t),
                b: lerp_u8(b1, b2, t),
                a: lerp_u8(a1, a2, t),
            },
            Interpolation::Step => {
                if t < 0.5 {
                    self.clone()
                } else {
                    other.clone()
                }
            }
        }
    }
}

fn parse_hex_color(s: &str) -> (u8, u8, u8, u8) {
    let s = s.trim_start_matches('#');
    let len = s.len();

    if len == 6 {
        let r = u8::from_str_radix(&s[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&s[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&s[4..6], 16).unwrap_or(0);
        (r, g, b, 255)
    } else if len == 8 {
        let r = u8::from_str_radix(&s[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&s[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&s[4..6], 16).unwrap_or(0);
        let a = u8::from_str_radix(&s[6..8], 16).unwrap_or(255);
        (r, g, b, a)
    } else {
        (0, 0, 0, 255)
    }
}

fn named_color(name: &str) -> (u8, u8, u8, u8) {
    match name.to_lowercase().as_str() {
        "transparent" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "green" => (0, 128, 0, 255),
        "blue" => (0, 0, 255, 255),
        "yellow" => (255, 255, 0, 255),
        "orange" => (255, 165, 0, 255),
        "purple" => (128, 0, 128, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        _ => (0, 0, 0, 255),
    }
}

/// Interpolation method between color stops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
}

/// Discrete classification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedConfig {
    /// Classification breaks, lowest first
    pub classes: Vec<ClassBreak>,
}

impl ClassifiedConfig {
    /// Build contiguous classes from ascending thresholds.
    ///
    /// `colors` needs one entry per class (`thresholds.len() + 1`); missing
    /// entries reuse the last color.
    pub fn from_thresholds(thresholds: &[f64], colors: &[Color]) -> Self {
        let mut bounds: Vec<Option<f64>> = vec![None];
        bounds.extend(thresholds.iter().copied().map(Some));
        bounds.push(None);

        let fallback = Color::Hex(UNKNOWN_COLOR.to_string());
        let classes = bounds
            .windows(2)
            .enumerate()
            .map(|(i, pair)| ClassBreak {
                min: pair[0],
                max: pair[1],
                color: colors
                    .get(i)
                    .or_else(|| colors.last())
                    .cloned()
                    .unwrap_or_else(|| fallback.clone()),
                label: None,
            })
            .collect();

        Self { classes }
    }

    /// Thresholds 4400/4550/4650 with green, yellow, orange and red.
    pub fn four_bucket() -> Self {
        let colors = ["green", "yellow", "orange", "red"].map(|c| Color::Named(c.to_string()));
        Self::from_thresholds(&[4400.0, 4550.0, 4650.0], &colors)
    }

    /// Check that classes cover the whole real line without gaps or overlaps.
    pub fn validate(&self) -> Result<(), String> {
        let (first, last) = match (self.classes.first(), self.classes.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err("Classification must have at least 1 class".to_string()),
        };

        if first.min.is_some() {
            return Err("First class must be unbounded below (no min)".to_string());
        }
        if last.max.is_some() {
            return Err("Last class must be unbounded above (no max)".to_string());
        }

        for class in &self.classes {
            if let (Some(min), Some(max)) = (class.min, class.max) {
                if min >= max {
                    return Err(format!("Class [{}, {}) is empty", min, max));
                }
            }
        }

        for pair in self.classes.windows(2) {
            match (pair[0].max, pair[1].min) {
                (Some(max), Some(min)) if max == min => {}
                (max, min) => {
                    return Err(format!(
                        "Classes must be contiguous: max {:?} is followed by min {:?}",
                        max, min
                    ))
                }
            }
        }

        Ok(())
    }

    /// Find the class holding a value.
    pub fn classify(&self, value: f64) -> Option<(usize, &ClassBreak)> {
        self.classes
            .iter()
            .enumerate()
            .find(|(_, class)| class.contains(value))
    }
}

/// A classification break/range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassBreak {
    /// Minimum value (inclusive), None for negative infinity
    #[serde(default)]
    pub min: Option<f64>,

    /// Maximum value (exclusive), None for positive infinity
    #[serde(default)]
    pub max: Option<f64>,

    /// Color for this class
    pub color: Color,

    /// Label for legend
    #[serde(default)]
    pub label: Option<String>,
}

impl ClassBreak {
    pub fn contains(&self, value: f64) -> bool {
        let in_min = self.min.map(|m| value >= m).unwrap_or(true);
        let in_max = self.max.map(|m| value < m).unwrap_or(true);
        in_min && in_max
    }

    /// The configured label, or one derived from the bounds.
    pub fn display_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        match (self.min, self.max) {
            (None, Some(max)) => format!("< {}", max),
            (Some(min), Some(max)) => format!("{} - {}", min, max),
            (Some(min), None) => format!(">= {}", min),
            (None, None) => "all values".to_string(),
        }
    }
}

/// Legend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegendConfig {
    /// Legend title
    #[serde(default)]
    pub title: Option<String>,

    /// Number of divisions for continuous schemes (entries = steps + 1)
    #[serde(default = "default_steps")]
    pub steps: usize,
}

fn default_steps() -> usize {
    6
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            title: None,
            steps: default_steps(),
        }
    }
}

/// Scheme-related errors.
#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
