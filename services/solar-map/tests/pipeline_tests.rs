//! End-to-end tests for a map run.

use std::path::Path;

use irradiance::Bucket;
use solar_common::{CellValue, DecimalSeparator, SchemeDefinition, SolarMapError};
use solar_map::{run, AppConfig, ConfigOverrides, InputSource, LegendFormat};
use test_utils::{create_lost_decimal_rows, fixtures, rows_to_csv, write_temp_csv, write_temp_file};

fn run_fixture(config: &AppConfig, csv: &str) -> Result<solar_map::MapRun, SolarMapError> {
    let file = write_temp_csv(csv);
    run(config, &InputSource::Path(file.path()))
}

// ============================================================================
// Successful runs
// ============================================================================

#[test]
fn test_lost_decimals_are_corrected() {
    let run = run_fixture(&AppConfig::default(), fixtures::LOST_DECIMALS).unwrap();
    let first = &run.layer.records[0];
    assert_eq!(first.longitude, CellValue::Number(-51.9253));
    assert_eq!(first.latitude, CellValue::Number(-14.235));
    assert_eq!(first.classification.bucket, Bucket::Index(2));

    // 6 cells, all corrected
    assert_eq!(run.layer.summary.corrected_coordinates, 6);
    assert_eq!(run.layer.summary.out_of_range, 0);
    assert_eq!(run.scheme_key, "four_bucket");
    assert_eq!(run.document(None).scheme, "four_bucket");
}

#[test]
fn test_semicolon_decimal_comma_table() {
    let mut config = AppConfig::default();
    config.apply_overrides(ConfigOverrides {
        decimal: Some(DecimalSeparator::Comma),
        ..ConfigOverrides::default()
    });

    let run = run_fixture(&config, fixtures::SEMICOLON_DECIMAL_COMMA).unwrap();
    let values: Vec<CellValue> = run.layer.records.iter().map(|r| r.value.clone()).collect();
    assert_eq!(
        values,
        vec![
            CellValue::Number(5012.5),
            CellValue::Number(4620.0),
            CellValue::Number(4480.0)
        ]
    );
    assert_eq!(run.layer.records[2].position(), Some((-14.235, -51.9253)));
}

#[test]
fn test_malformed_rows_do_not_abort() {
    let run = run_fixture(&AppConfig::default(), fixtures::MALFORMED_VALUES).unwrap();
    let summary = &run.layer.summary;
    assert_eq!(summary.total_rows, 4);
    assert_eq!(summary.plotted, 3);
    assert_eq!(summary.unplotted, vec![3]);
    assert_eq!(summary.unknown_values, 2);
    assert_eq!(run.layer.legend.entries.last().unwrap().bucket, Bucket::Unknown);
}

#[test]
fn test_unplotted_lines_match_the_file_after_blank_lines() {
    let run = run_fixture(
        &AppConfig::default(),
        "LON,LAT,ANNUAL\n-47.9,-15.8,4500\n\nnorth,-15.8,4600\n",
    )
    .unwrap();
    assert_eq!(run.layer.summary.unplotted, vec![4]);
    assert_eq!(run.layer.records[1].line, 4);
}

#[test]
fn test_custom_columns_and_scheme_from_file() {
    let config_file = write_temp_file(
        r##"
table:
  columns:
    longitude: longitude
    latitude: latitude
    value: irradiacao
scheme: five_bucket
popup_template: "Irradiação: {value} kWh/m²/ano"
"##,
        "yaml",
    );
    let config = AppConfig::from_file(config_file.path()).unwrap();
    let run = run_fixture(&config, fixtures::PORTUGUESE_HEADERS).unwrap();

    assert_eq!(run.scheme_key, "five_bucket");
    assert_eq!(run.scheme.name, SchemeDefinition::five_bucket().name);
    assert_eq!(run.layer.legend.entries.len(), 5);
    assert_eq!(run.layer.records[1].popup, "Irradiação: 4620 kWh/m²/ano");
}

#[test]
fn test_scheme_file_adds_named_scheme() {
    let scheme_file = write_temp_file(
        r##"{
  "version": "1.0",
  "schemes": {
    "two_tone": {
      "name": "two_tone",
      "type": "classified",
      "classes": [
        { "max": 4500, "color": "#0000ff" },
        { "min": 4500, "color": "#ff0000" }
      ]
    }
  }
}"##,
        "json",
    );

    let mut config = AppConfig::default();
    config.apply_overrides(ConfigOverrides {
        scheme: Some("two_tone".to_string()),
        scheme_files: vec![scheme_file.path().to_path_buf()],
        ..ConfigOverrides::default()
    });

    let run = run_fixture(&config, fixtures::VALID_COMMA).unwrap();
    assert_eq!(run.layer.summary.bucket_counts, vec![2, 2]);
    assert_eq!(run.layer.records[0].classification.color.to_hex(), "#ff0000");
}

#[test]
fn test_observed_ramp_over_generated_rows() {
    let config = AppConfig {
        scheme: "observed_ramp".to_string(),
        ..AppConfig::default()
    };
    let run = run_fixture(&config, &rows_to_csv(&create_lost_decimal_rows(50))).unwrap();

    let range = run.layer.summary.value_range.unwrap();
    assert!(range.min >= 3800.0 && range.max < 5600.0);
    // 6 steps gives 7 entries, no unknown row
    assert_eq!(run.layer.legend.entries.len(), 7);
    assert!(run.layer.center.is_some());
}

#[test]
fn test_document_has_one_feature_per_plotted_row() {
    let run = run_fixture(&AppConfig::default(), fixtures::MALFORMED_VALUES).unwrap();
    let doc = run.document(Some("malformed.csv".to_string()));
    assert_eq!(doc.features.len(), run.layer.summary.plotted);

    let json: serde_json::Value = serde_json::from_str(&doc.to_json(true).unwrap()).unwrap();
    assert_eq!(json["source"], "malformed.csv");
    assert_eq!(json["features"]["features"][0]["properties"]["bucket"], "unknown");
    assert_eq!(json["features"]["features"][0]["properties"]["color"], "#808080");
}

#[test]
fn test_document_scheme_can_be_selected_again() {
    let run = run_fixture(&AppConfig::default(), fixtures::VALID_COMMA).unwrap();
    let doc = run.document(None);
    assert_eq!(doc.scheme, "four_bucket");

    let again = AppConfig {
        scheme: doc.scheme.clone(),
        ..AppConfig::default()
    };
    assert_eq!(again.resolve_scheme().unwrap().name, run.scheme.name);
}

#[test]
fn test_legend_formats() {
    let run = run_fixture(&AppConfig::default(), fixtures::VALID_COMMA).unwrap();
    let table = solar_map::render_legend(&run.layer.legend, LegendFormat::Table)
        .unwrap()
        .unwrap();
    assert!(table.contains("#ffa500"));
    let markdown = solar_map::render_legend(&run.layer.legend, LegendFormat::Markdown)
        .unwrap()
        .unwrap();
    assert!(markdown.contains('|'));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_column_fails_the_run() {
    let err = run_fixture(&AppConfig::default(), fixtures::MISSING_ANNUAL).unwrap_err();
    assert!(matches!(&err, SolarMapError::MissingColumns(cols) if cols == &vec!["ANNUAL".to_string()]));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_header_only_is_empty_table() {
    let err = run_fixture(&AppConfig::default(), fixtures::HEADER_ONLY).unwrap_err();
    assert!(matches!(err, SolarMapError::EmptyTable));
}

#[test]
fn test_unknown_scheme() {
    let config = AppConfig {
        scheme: "nope".to_string(),
        ..AppConfig::default()
    };
    let err = run_fixture(&config, fixtures::VALID_COMMA).unwrap_err();
    assert!(matches!(err, SolarMapError::SchemeNotFound(_)));
}

#[test]
fn test_missing_input_file() {
    let err = run(
        &AppConfig::default(),
        &InputSource::Path(Path::new("/nonexistent/input.csv")),
    )
    .unwrap_err();
    assert!(matches!(err, SolarMapError::ReadError(_)));
}

#[test]
fn test_invalid_normalizer_rejected_before_reading() {
    let mut config = AppConfig::default();
    config.apply_overrides(ConfigOverrides {
        latitude_bound: Some(-1.0),
        ..ConfigOverrides::default()
    });
    let err = run(&config, &InputSource::Path(Path::new("/nonexistent/input.csv"))).unwrap_err();
    assert!(matches!(err, SolarMapError::InvalidParameter { .. }));
}
