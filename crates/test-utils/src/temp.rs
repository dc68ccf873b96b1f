//! Temp file helpers.

use std::io::Write;
use tempfile::NamedTempFile;

/// Write `contents` to a temp file with the given extension.
///
/// The file is deleted when the returned handle is dropped.
pub fn write_temp_file(contents: &str, extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("solar-map-test-")
        .suffix(&format!(".{}", extension))
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Write a CSV fixture to a temp file.
pub fn write_temp_csv(contents: &str) -> NamedTempFile {
    write_temp_file(contents, "csv")
}
