//! Tests for table loading and column validation.

use ingestion::{ColumnNames, IngestionError, TableConfig, TableReader};
use solar_common::{DecimalSeparator, SolarMapError};
use test_utils::{fixtures, write_temp_csv};

fn reader() -> TableReader {
    TableReader::default()
}

// ============================================================================
// Delimiters and formats
// ============================================================================

#[test]
fn test_reads_comma_table() {
    let table = reader().read_str(fixtures::VALID_COMMA).unwrap();
    assert_eq!(table.delimiter, ',');
    assert_eq!(table.headers, vec!["LON", "LAT", "ANNUAL"]);
    assert_eq!(table.len(), 4);

    let first = &table.records[0];
    assert_eq!(first.line, 2);
    assert_eq!(first.longitude, "-47.9292");
    assert_eq!(first.latitude, "-15.7801");
    assert_eq!(first.value, "5012");
}

#[test]
fn test_sniffs_semicolon_and_keeps_decimal_commas() {
    let table = reader().read_str(fixtures::SEMICOLON_DECIMAL_COMMA).unwrap();
    assert_eq!(table.delimiter, ';');
    assert_eq!(table.records[0].longitude, "-47,9292");
    assert_eq!(table.records[2].value, "4.480,0");
}

#[test]
fn test_explicit_delimiter_overrides_sniffing() {
    let config = TableConfig {
        delimiter: Some(';'),
        decimal: DecimalSeparator::Comma,
        ..TableConfig::default()
    };
    let table = TableReader::new(config)
        .unwrap()
        .read_str(fixtures::SEMICOLON_DECIMAL_COMMA)
        .unwrap();
    assert_eq!(table.len(), 3);
}

#[test]
fn test_tab_with_bom_and_padded_headers() {
    let table = reader().read_str(fixtures::TAB_WITH_BOM).unwrap();
    assert_eq!(table.delimiter, '\t');
    assert_eq!(table.headers, vec!["LON", "LAT", "ANNUAL"]);
    assert_eq!(table.records[0].value, "5012");
}

#[test]
fn test_ragged_rows_get_empty_cells() {
    let table = reader().read_str(fixtures::RAGGED).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.records[1].value, "");
}

#[test]
fn test_header_only_is_empty_table() {
    let table = reader().read_str(fixtures::HEADER_ONLY).unwrap();
    assert!(table.is_empty());
}

// ============================================================================
// Column validation
// ============================================================================

#[test]
fn test_missing_column_is_a_single_error() {
    let err = reader().read_str(fixtures::MISSING_ANNUAL).unwrap_err();
    match &err {
        IngestionError::MissingColumns { missing, found } => {
            assert_eq!(missing, &vec!["ANNUAL".to_string()]);
            assert_eq!(found, &vec!["LON".to_string(), "LAT".to_string(), "GHI".to_string()]);
        }
        other => panic!("Expected MissingColumns, got {:?}", other),
    }
    assert_eq!(err.to_string(), "Missing required columns: ANNUAL");

    let mapped: SolarMapError = err.into();
    assert_eq!(mapped.error_code(), "MissingColumns");
}

#[test]
fn test_empty_input_reports_every_column() {
    let err = reader().read_str("").unwrap_err();
    assert_eq!(err.to_string(), "Missing required columns: LON, LAT, ANNUAL");
}

#[test]
fn test_custom_column_names() {
    let config = TableConfig {
        columns: ColumnNames::new("longitude", "latitude", "irradiacao"),
        ..TableConfig::default()
    };
    let table = TableReader::new(config)
        .unwrap()
        .read_str(fixtures::PORTUGUESE_HEADERS)
        .unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.records[1].value, "4620");

    // The defaults do not match these headers
    assert!(reader().read_str(fixtures::PORTUGUESE_HEADERS).is_err());
}

#[test]
fn test_case_insensitive_headers() {
    let config = TableConfig {
        columns: ColumnNames::new("lon", "lat", "annual"),
        case_insensitive_headers: true,
        ..TableConfig::default()
    };
    let table = TableReader::new(config)
        .unwrap()
        .read_str(fixtures::VALID_COMMA)
        .unwrap();
    assert_eq!(table.len(), 4);
}

#[test]
fn test_config_from_yaml() {
    let yaml = r#"
columns:
  longitude: longitude
  latitude: latitude
  value: irradiacao
delimiter: ";"
decimal: comma
"#;
    let config: TableConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.delimiter, Some(';'));
    assert_eq!(config.decimal, DecimalSeparator::Comma);
    assert_eq!(config.columns.value, "irradiacao");
}

// ============================================================================
// Row-level problems
// ============================================================================

#[test]
fn test_malformed_cells_are_kept_as_text() {
    let table = reader().read_str(fixtures::MALFORMED_VALUES).unwrap();
    assert_eq!(table.len(), 4);
    assert!(table.issues.is_empty());
    assert_eq!(table.records[0].value, "abc");
    assert_eq!(table.records[1].longitude, "north");
    assert_eq!(table.records[2].value, "");
}

#[test]
fn test_line_numbers_count_blank_lines() {
    let table = reader()
        .read_str("LON,LAT,ANNUAL\n-47.9,-15.8,4500\n\nnorth,-15.8,4600\n\n\n-43.1,-22.9,4620\n")
        .unwrap();
    let lines: Vec<usize> = table.records.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![2, 4, 7]);
}

#[test]
fn test_latin1_bytes_do_not_fail_the_file() {
    let mut bytes = b"LON,LAT,ANNUAL,NOME\n-47.9,-15.7,5012,Bras".to_vec();
    bytes.push(0xED); // 'í' in Latin-1
    bytes.extend_from_slice(b"lia\n");
    let table = reader().read_bytes(&bytes).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.records[0].value, "5012");
}

// ============================================================================
// Files
// ============================================================================

#[test]
fn test_read_path() {
    let file = write_temp_csv(fixtures::LOST_DECIMALS);
    let table = reader().read_path(file.path()).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.records[0].longitude, "-519253");
}

#[test]
fn test_missing_file_is_read_error() {
    let err = reader().read_path("/nonexistent/solar.csv").unwrap_err();
    assert!(matches!(err, IngestionError::FileRead(_)));
    let mapped: SolarMapError = err.into();
    assert_eq!(mapped.exit_code(), 4);
}
