//! Run configuration.
//!
//! Settings come from three layers: built-in defaults, an optional YAML file
//! and command line flags. Each layer overrides the one before it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ingestion::TableConfig;
use irradiance::{LayerOptions, NormalizerConfig};
use serde::{Deserialize, Serialize};
use solar_common::{
    DecimalSeparator, LegendConfig, SchemeConfig, SchemeDefinition, SolarMapError, SolarMapResult,
};
use tracing::{debug, info, warn};

/// Scheme used when none is selected.
pub const DEFAULT_SCHEME: &str = "four_bucket";

/// Everything a map run needs besides the input table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// How to read the input table
    #[serde(default)]
    pub table: TableConfig,

    /// Coordinate correction settings
    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Name of the classification scheme to apply
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Additional scheme files (YAML or JSON), loaded in order
    #[serde(default)]
    pub scheme_files: Vec<PathBuf>,

    /// Inline scheme definitions, keyed by name
    #[serde(default)]
    pub schemes: HashMap<String, SchemeDefinition>,

    /// Legend settings; replaces the scheme's own when set
    #[serde(default)]
    pub legend: Option<LegendConfig>,

    /// Marker popup text with a `{value}` placeholder
    #[serde(default)]
    pub popup_template: Option<String>,
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            normalizer: NormalizerConfig::default(),
            scheme: default_scheme(),
            scheme_files: Vec::new(),
            schemes: HashMap::new(),
            legend: None,
            popup_template: None,
        }
    }
}

/// Values given on the command line. `None` leaves the file setting alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub scheme: Option<String>,
    pub scheme_files: Vec<PathBuf>,
    pub delimiter: Option<char>,
    pub decimal: Option<DecimalSeparator>,
    pub longitude_column: Option<String>,
    pub latitude_column: Option<String>,
    pub value_column: Option<String>,
    pub case_insensitive_headers: bool,
    pub longitude_bound: Option<f64>,
    pub latitude_bound: Option<f64>,
    pub max_divisions: Option<u32>,
    pub legacy_bounds: bool,
    pub legend_steps: Option<usize>,
    pub popup_template: Option<String>,
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> SolarMapResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SolarMapError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = Self::from_yaml(&content).map_err(|e| match e {
            SolarMapError::ConfigError(msg) => {
                SolarMapError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        info!(path = %path.display(), scheme = %config.scheme, "Loaded configuration file");
        Ok(config)
    }

    pub fn from_yaml(yaml: &str) -> SolarMapResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| SolarMapError::ConfigError(e.to_string()))
    }

    /// Load from `path` when given, otherwise start from defaults.
    pub fn load(path: Option<&Path>) -> SolarMapResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Apply command line values on top of this configuration.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(scheme) = overrides.scheme {
            self.scheme = scheme;
        }
        self.scheme_files.extend(overrides.scheme_files);

        if overrides.delimiter.is_some() {
            self.table.delimiter = overrides.delimiter;
        }
        if let Some(decimal) = overrides.decimal {
            self.table.decimal = decimal;
        }

        let columns = &mut self.table.columns;
        if let Some(name) = overrides.longitude_column {
            columns.longitude = name;
        }
        if let Some(name) = overrides.latitude_column {
            columns.latitude = name;
        }
        if let Some(name) = overrides.value_column {
            columns.value = name;
        }
        if overrides.case_insensitive_headers {
            self.table.case_insensitive_headers = true;
        }

        // Legacy first, so explicit bounds still win over it
        if overrides.legacy_bounds {
            self.normalizer = NormalizerConfig::legacy();
        }
        if let Some(limit) = overrides.longitude_bound {
            self.normalizer.bounds.longitude = limit;
        }
        if let Some(limit) = overrides.latitude_bound {
            self.normalizer.bounds.latitude = limit;
        }
        if let Some(max) = overrides.max_divisions {
            self.normalizer.max_divisions = max;
        }

        if let Some(steps) = overrides.legend_steps {
            self.legend.get_or_insert_with(LegendConfig::default).steps = steps;
        }
        if overrides.popup_template.is_some() {
            self.popup_template = overrides.popup_template;
        }
    }

    /// Check settings that do not depend on the input.
    pub fn validate(&self) -> SolarMapResult<()> {
        self.table.validate().map_err(SolarMapError::from)?;
        self.normalizer.validate()?;

        if let Some(legend) = &self.legend {
            if legend.steps == 0 {
                return Err(SolarMapError::InvalidParameter {
                    param: "legend.steps".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
        }

        if let Some(template) = &self.popup_template {
            if !template.contains("{value}") {
                warn!(template = %template, "Popup template has no {{value}} placeholder");
            }
        }

        Ok(())
    }

    /// Built-in schemes plus scheme files plus inline schemes, later ones
    /// replacing earlier ones with the same name.
    pub fn scheme_config(&self) -> SolarMapResult<SchemeConfig> {
        let mut config = SchemeConfig::builtin();

        for path in &self.scheme_files {
            let loaded = SchemeConfig::from_file(path)?;
            debug!(
                path = %path.display(),
                schemes = loaded.schemes.len(),
                "Loaded scheme file"
            );
            config = config.merge(loaded);
        }

        config.schemes.extend(
            self.schemes
                .iter()
                .map(|(name, def)| (name.clone(), def.clone())),
        );

        config.validate()?;
        Ok(config)
    }

    /// The selected scheme, with the configured legend applied.
    pub fn resolve_scheme(&self) -> SolarMapResult<SchemeDefinition> {
        let schemes = self.scheme_config()?;
        let mut scheme = schemes.get(&self.scheme).cloned().ok_or_else(|| {
            SolarMapError::SchemeNotFound(format!(
                "{} (available: {})",
                self.scheme,
                schemes.names().join(", ")
            ))
        })?;

        if self.legend.is_some() {
            scheme.legend = self.legend.clone();
        }
        Ok(scheme)
    }

    pub fn layer_options(&self) -> LayerOptions {
        let mut options = LayerOptions {
            normalizer: self.normalizer.clone(),
            decimal: self.table.decimal,
            ..LayerOptions::default()
        };
        if let Some(template) = &self.popup_template {
            options.popup_template = template.clone();
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_common::AxisBounds;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.scheme, "four_bucket");
        assert_eq!(config.normalizer.max_divisions, 6);
        assert_eq!(config.normalizer.bounds.latitude, 90.0);
        config.validate().unwrap();
        assert_eq!(
            config.resolve_scheme().unwrap().name,
            SchemeDefinition::four_bucket().name
        );
    }

    #[test]
    fn test_yaml_with_inline_scheme() {
        let yaml = r##"
table:
  columns:
    value: GHI
  delimiter: ";"
  decimal: comma
normalizer:
  bounds:
    latitude: 180
  max_divisions: 3
scheme: coarse
schemes:
  coarse:
    name: coarse
    type: classified
    classes:
      - max: 4500
        color: "#0000ff"
      - min: 4500
        color: "#ff0000"
popup_template: "GHI {value}"
"##;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.table.columns.value, "GHI");
        assert_eq!(config.table.columns.longitude, "LON");
        assert_eq!(config.table.decimal, DecimalSeparator::Comma);
        assert_eq!(config.normalizer.bounds.latitude, 180.0);
        assert_eq!(config.normalizer.bounds.longitude, 180.0);
        assert_eq!(config.normalizer.max_divisions, 3);

        let scheme = config.resolve_scheme().unwrap();
        assert_eq!(scheme.name, "coarse");
        assert_eq!(config.layer_options().popup_template, "GHI {value}");
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = AppConfig::from_yaml("scheme: five_bucket\n").unwrap();
        config.apply_overrides(ConfigOverrides {
            scheme: Some("seven_bucket".to_string()),
            value_column: Some("irradiacao".to_string()),
            decimal: Some(DecimalSeparator::Comma),
            legacy_bounds: true,
            max_divisions: Some(4),
            legend_steps: Some(3),
            ..ConfigOverrides::default()
        });

        assert_eq!(config.scheme, "seven_bucket");
        assert_eq!(config.table.columns.value, "irradiacao");
        assert_eq!(config.table.decimal, DecimalSeparator::Comma);
        assert_eq!(config.normalizer.bounds, AxisBounds::uniform(180.0));
        assert_eq!(config.normalizer.max_divisions, 4);
        assert_eq!(config.legend.as_ref().map(|l| l.steps), Some(3));
        assert_eq!(config.layer_options().decimal, DecimalSeparator::Comma);
    }

    #[test]
    fn test_unknown_scheme_lists_available() {
        let config = AppConfig {
            scheme: "rainbow".to_string(),
            ..AppConfig::default()
        };
        let err = config.resolve_scheme().unwrap_err();
        assert!(matches!(err, SolarMapError::SchemeNotFound(_)));
        assert!(err.to_string().contains("four_bucket"));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = AppConfig::from_yaml("scheme: [unclosed").unwrap_err();
        assert!(matches!(err, SolarMapError::ConfigError(_)));
    }

    #[test]
    fn test_zero_legend_steps_rejected() {
        let config = AppConfig {
            legend: Some(LegendConfig {
                title: None,
                steps: 0,
            }),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
