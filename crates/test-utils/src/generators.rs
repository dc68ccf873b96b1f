//! Test data generators for synthetic irradiation tables.
//!
//! These generators create predictable, verifiable rows so tests can check
//! exact outputs without fixtures on disk.

use solar_common::RawRecord;

/// Creates `n` rows spread over Brazil with valid coordinates.
///
/// Row `i` (0-based) has:
/// - longitude `-70 + (i % 35)`
/// - latitude `-30 + (i % 21)`, so never closer to the equator than 10°
/// - value `3800 + (i * 37) % 1800`
///
/// Line numbers start at 2, matching a table with one header line.
///
/// # Example
///
/// ```
/// use test_utils::create_irradiance_rows;
///
/// let rows = create_irradiance_rows(3);
/// assert_eq!(rows.len(), 3);
/// assert_eq!(rows[0].longitude, "-70");
/// assert_eq!(rows[1].value, "3837");
/// assert_eq!(rows[2].line, 4);
/// ```
pub fn create_irradiance_rows(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            RawRecord::new(
                i + 2,
                format!("{}", -70 + (i % 35) as i64),
                format!("{}", -30 + (i % 21) as i64),
                format!("{}", 3800 + (i * 37) % 1800),
            )
        })
        .collect()
}

/// Same as [`create_irradiance_rows`] but with every coordinate written as
/// if `-70.0000` had lost its decimal point, so `-70` becomes `-700000`.
///
/// The generated degrees stay at or above 10 in magnitude, where the
/// correction is unambiguous; see [`append_lost_digits`] for the rest.
pub fn create_lost_decimal_rows(n: usize) -> Vec<RawRecord> {
    create_irradiance_rows(n)
        .into_iter()
        .map(|mut row| {
            row.longitude = append_lost_digits(&row.longitude);
            row.latitude = append_lost_digits(&row.latitude);
            row
        })
        .collect()
}

/// An integer coordinate as it reads after `.0000` lost its decimal point:
/// `-70` becomes `-700000`.
///
/// Small degrees are ambiguous once the point is gone. `-10` becomes
/// `-100000`, which the normalizer reads back as `-100` on the longitude
/// axis.
pub fn append_lost_digits(value: &str) -> String {
    format!("{}0000", value)
}

/// Renders rows as a CSV table with a `LON,LAT,ANNUAL` header.
pub fn rows_to_csv(rows: &[RawRecord]) -> String {
    let mut out = String::from("LON,LAT,ANNUAL\n");
    for row in rows {
        out.push_str(&format!("{},{},{}\n", row.longitude, row.latitude, row.value));
    }
    out
}
