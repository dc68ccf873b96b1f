//! Solar irradiation map generation.
//!
//! Reads a table of longitude, latitude and annual irradiation, repairs
//! coordinates that lost their decimal point, classifies each value into a
//! colored bucket and writes the result as a GeoJSON-based map document.

pub mod config;
pub mod document;
pub mod output;
pub mod pipeline;

pub use config::{AppConfig, ConfigOverrides, DEFAULT_SCHEME};
pub use document::MapDocument;
pub use output::{render_legend, render_preview, render_summary, write_output, LegendFormat};
pub use pipeline::{build_map, load_table, run, InputSource, MapRun};
