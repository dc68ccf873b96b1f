//! Common CSV fixtures.
//!
//! Each constant is a complete table as it arrives from a user upload.

/// Comma-separated, point decimals, coordinates already valid.
pub const VALID_COMMA: &str = "\
LON,LAT,ANNUAL
-47.9292,-15.7801,5012
-43.1729,-22.9068,4620
-60.0217,-3.1190,4380
-51.2177,-30.0346,4480
";

/// Coordinates written without their decimal point.
pub const LOST_DECIMALS: &str = "\
LON,LAT,ANNUAL
-519253,-142350,4620
-4792,-1578,4300
-431729,-229068,4700
";

/// Semicolon-separated with decimal commas, as exported by spreadsheet
/// software in pt-BR locales.
pub const SEMICOLON_DECIMAL_COMMA: &str = "\
LON;LAT;ANNUAL
-47,9292;-15,7801;5012,5
-43,1729;-22,9068;4620
-519253;-142350;4.480,0
";

/// Custom column names.
pub const PORTUGUESE_HEADERS: &str = "\
longitude,latitude,irradiacao
-47.9292,-15.7801,5012
-43.1729,-22.9068,4620
";

/// Missing the ANNUAL column.
pub const MISSING_ANNUAL: &str = "\
LON,LAT,GHI
-47.9292,-15.7801,5012
";

/// Rows with values that do not parse.
pub const MALFORMED_VALUES: &str = "\
LON,LAT,ANNUAL
-47.9292,-15.7801,abc
north,-22.9068,4620
-60.0217,-3.1190,
-51.2177,-30.0346,4480
";

/// Tab-separated with surrounding whitespace and a UTF-8 BOM.
pub const TAB_WITH_BOM: &str = "\u{feff} LON \t LAT \t ANNUAL \n-47.9292\t-15.7801\t5012\n";

/// Header only.
pub const HEADER_ONLY: &str = "LON,LAT,ANNUAL\n";

/// Rows with a varying number of fields.
pub const RAGGED: &str = "\
LON,LAT,ANNUAL
-47.9292,-15.7801,5012
-43.1729,-22.9068
";
