//! Writing documents and rendering human-readable reports.

use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use ingestion::IrradianceTable;
use irradiance::{LayerSummary, Legend};
use serde::{Deserialize, Serialize};
use solar_common::{SolarMapError, SolarMapResult};
use tracing::info;

/// How the legend is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendFormat {
    #[default]
    Table,
    Markdown,
    Json,
    /// Do not print the legend
    None,
}

pub fn render_legend(legend: &Legend, format: LegendFormat) -> SolarMapResult<Option<String>> {
    let rendered = match format {
        LegendFormat::Table => legend.render_table(),
        LegendFormat::Markdown => legend.render_markdown(),
        LegendFormat::Json => serde_json::to_string_pretty(legend)?,
        LegendFormat::None => return Ok(None),
    };
    Ok(Some(rendered))
}

/// The first `n` rows as they were read, before any correction.
pub fn render_preview(table: &IrradianceTable, n: usize) -> String {
    let rows = table.preview(n);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Preview: {} of {} rows (delimiter {:?})",
        rows.len(),
        table.len(),
        table.delimiter
    );

    let line_width = rows
        .iter()
        .map(|r| r.line.to_string().len())
        .max()
        .unwrap_or(0)
        .max("line".len());
    let lon_width = rows.iter().map(|r| r.longitude.len()).max().unwrap_or(0).max(9);
    let lat_width = rows.iter().map(|r| r.latitude.len()).max().unwrap_or(0).max(8);

    let _ = writeln!(
        out,
        "{:>lw$}  {:<ow$}  {:<aw$}  value",
        "line",
        "longitude",
        "latitude",
        lw = line_width,
        ow = lon_width,
        aw = lat_width
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:>lw$}  {:<ow$}  {:<aw$}  {}",
            row.line,
            row.longitude,
            row.latitude,
            row.value,
            lw = line_width,
            ow = lon_width,
            aw = lat_width
        );
    }
    out
}

/// One paragraph describing what a run did.
pub fn render_summary(summary: &LayerSummary) -> String {
    let mut out = format!(
        "Plotted {} of {} rows.",
        summary.plotted, summary.total_rows
    );

    if summary.corrected_coordinates > 0 {
        let _ = write!(
            out,
            " Corrected {} coordinate{} with a misplaced decimal point.",
            summary.corrected_coordinates,
            plural(summary.corrected_coordinates)
        );
    }
    if summary.out_of_range > 0 {
        let _ = write!(
            out,
            " {} row{} still out of range.",
            summary.out_of_range,
            plural(summary.out_of_range)
        );
    }
    if summary.unknown_values > 0 {
        let _ = write!(
            out,
            " {} value{} not numeric, shown as unknown.",
            summary.unknown_values,
            plural(summary.unknown_values)
        );
    }
    if !summary.unplotted.is_empty() {
        let lines: Vec<String> = summary.unplotted.iter().map(usize::to_string).collect();
        let _ = write!(
            out,
            " Not plotted (non-numeric coordinates): line{} {}.",
            plural(lines.len()),
            lines.join(", ")
        );
    }
    out
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Write `contents` to `path`, or to stdout when no path is given.
pub fn write_output(contents: &str, path: Option<&Path>) -> SolarMapResult<()> {
    match path {
        Some(path) => {
            std::fs::write(path, contents).map_err(|e| {
                SolarMapError::WriteError(format!("{}: {}", path.display(), e))
            })?;
            info!(path = %path.display(), bytes = contents.len(), "Wrote map document");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(contents.as_bytes())
                .and_then(|_| stdout.write_all(b"\n"))
                .and_then(|_| stdout.flush())
                .map_err(|e| SolarMapError::WriteError(format!("stdout: {}", e)))?;
        }
    }
    Ok(())
}
