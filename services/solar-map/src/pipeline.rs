//! A complete map run: load, correct, classify.

use std::path::Path;

use ingestion::{IrradianceTable, TableReader};
use irradiance::{LayerBuilder, MarkerLayer};
use solar_common::{SchemeDefinition, SolarMapError, SolarMapResult};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::document::MapDocument;

/// Where the table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource<'a> {
    Path(&'a Path),
    Stdin,
}

impl<'a> InputSource<'a> {
    /// `-` means stdin.
    pub fn from_arg(arg: &'a Path) -> Self {
        if arg.as_os_str() == "-" {
            InputSource::Stdin
        } else {
            InputSource::Path(arg)
        }
    }

    /// File name used in the output document.
    pub fn name(&self) -> Option<String> {
        match self {
            InputSource::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            InputSource::Stdin => None,
        }
    }
}

/// Output of a run.
#[derive(Debug, Clone)]
pub struct MapRun {
    pub table: IrradianceTable,

    /// Name the scheme was selected by; accepted back by `--scheme`
    pub scheme_key: String,

    pub scheme: SchemeDefinition,
    pub layer: MarkerLayer,
}

impl MapRun {
    pub fn document(&self, source: Option<String>) -> MapDocument {
        MapDocument::from_layer(&self.layer, &self.scheme_key, source)
    }
}

/// Read the table described by `config`.
pub fn load_table(config: &AppConfig, input: &InputSource<'_>) -> SolarMapResult<IrradianceTable> {
    let reader = TableReader::new(config.table.clone())?;
    let table = match input {
        InputSource::Path(path) => reader.read_path(path)?,
        InputSource::Stdin => reader.read_from(std::io::stdin().lock())?,
    };

    for issue in &table.issues {
        warn!(line = issue.line, message = %issue.message, "Row skipped");
    }
    Ok(table)
}

/// Correct and classify an already loaded table.
pub fn build_map(config: &AppConfig, table: IrradianceTable) -> SolarMapResult<MapRun> {
    if table.is_empty() {
        return Err(SolarMapError::EmptyTable);
    }

    let scheme = config.resolve_scheme()?;
    let builder = LayerBuilder::new(scheme, config.layer_options())?;
    let layer = builder.build(&table.records)?;

    info!(
        rows = layer.summary.total_rows,
        plotted = layer.summary.plotted,
        corrected = layer.summary.corrected_coordinates,
        out_of_range = layer.summary.out_of_range,
        unknown = layer.summary.unknown_values,
        scheme = %config.scheme,
        "Map ready"
    );

    Ok(MapRun {
        table,
        scheme_key: config.scheme.clone(),
        scheme: builder.scheme().clone(),
        layer,
    })
}

/// Validate the configuration, load the table and build the map.
pub fn run(config: &AppConfig, input: &InputSource<'_>) -> SolarMapResult<MapRun> {
    config.validate()?;
    let table = load_table(config, input)?;
    build_map(config, table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_source_from_arg() {
        assert_eq!(InputSource::from_arg(Path::new("-")), InputSource::Stdin);
        let source = InputSource::from_arg(Path::new("/data/brasil.csv"));
        assert_eq!(source.name().as_deref(), Some("brasil.csv"));
        assert_eq!(InputSource::Stdin.name(), None);
    }
}
