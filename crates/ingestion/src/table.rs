//! Reading irradiation tables.

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use solar_common::RawRecord;
use tracing::{debug, info, warn};

use crate::config::TableConfig;
use crate::error::{IngestionError, Result};
use crate::sniff::sniff_delimiter;

/// A row that could not be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowIssue {
    pub line: usize,
    pub message: String,
}

/// A loaded table: the three required columns of every row, as text.
#[derive(Debug, Clone, Serialize)]
pub struct IrradianceTable {
    /// All header names, trimmed
    pub headers: Vec<String>,

    /// Delimiter used to split fields
    pub delimiter: char,

    pub records: Vec<RawRecord>,

    /// Rows skipped because the reader could not decode them
    pub issues: Vec<RowIssue>,
}

impl IrradianceTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first `n` rows.
    pub fn preview(&self, n: usize) -> &[RawRecord] {
        &self.records[..n.min(self.records.len())]
    }
}

/// Column positions of the required fields.
struct ColumnIndex {
    longitude: usize,
    latitude: usize,
    value: usize,
}

/// Maps record byte offsets to 1-based line numbers.
///
/// A record's position may point at blank lines the reader skipped before
/// it, so line terminators at the offset are stepped over first. Offsets
/// arrive in increasing order, which keeps counting linear.
struct LineIndex<'a> {
    text: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text: text.as_bytes(),
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, byte: usize) -> usize {
        let mut target = byte.min(self.text.len());
        while matches!(self.text.get(target), Some(b'\n' | b'\r')) {
            target += 1;
        }

        if target < self.offset {
            self.offset = 0;
            self.line = 1;
        }

        self.line += self.text[self.offset..target]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.offset = target;
        self.line
    }
}

/// Reads tables according to a [`TableConfig`].
#[derive(Debug, Clone, Default)]
pub struct TableReader {
    config: TableConfig,
}

impl TableReader {
    pub fn new(config: TableConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Read a table from a file.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<IrradianceTable> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading table");
        let bytes = std::fs::read(path)?;
        self.read_bytes(&bytes)
    }

    /// Read a table from any reader, e.g. stdin.
    pub fn read_from(&self, mut reader: impl Read) -> Result<IrradianceTable> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.read_bytes(&bytes)
    }

    /// Read a table from bytes. Invalid UTF-8 sequences are replaced so that
    /// Latin-1 exports still load; only the affected cells become unreadable.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<IrradianceTable> {
        let text = String::from_utf8_lossy(bytes);
        if let std::borrow::Cow::Owned(_) = text {
            warn!("Input is not valid UTF-8; invalid bytes were replaced");
        }
        self.read_str(&text)
    }

    /// Read a table from text.
    pub fn read_str(&self, text: &str) -> Result<IrradianceTable> {
        let text = text.trim_start_matches('\u{feff}');

        let delimiter = match self.config.delimiter()? {
            Some(d) => d,
            None => {
                let sniffed = sniff_delimiter(text);
                debug!(delimiter = %(sniffed as char).escape_debug(), "Sniffed delimiter");
                sniffed
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let index = self.locate_columns(&headers)?;

        let mut records = Vec::new();
        let mut issues = Vec::new();
        let mut lines = LineIndex::new(text);

        for (idx, result) in reader.records().enumerate() {
            // records() starts after the header line
            let fallback_line = idx + 2;

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    let line = e
                        .position()
                        .map(|p| lines.line_at(p.byte() as usize))
                        .unwrap_or(fallback_line);
                    warn!(line, error = %e, "Skipping unreadable row");
                    issues.push(RowIssue {
                        line,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let line = record
                .position()
                .map(|p| lines.line_at(p.byte() as usize))
                .unwrap_or(fallback_line);

            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let field = |i: usize| record.get(i).unwrap_or("").to_string();
            records.push(RawRecord {
                line,
                longitude: field(index.longitude),
                latitude: field(index.latitude),
                value: field(index.value),
            });
        }

        info!(
            rows = records.len(),
            skipped = issues.len(),
            delimiter = %(delimiter as char).escape_debug(),
            "Loaded table"
        );

        Ok(IrradianceTable {
            headers,
            delimiter: delimiter as char,
            records,
            issues,
        })
    }

    fn locate_columns(&self, headers: &[String]) -> Result<ColumnIndex> {
        let find = |wanted: &str| {
            headers.iter().position(|h| {
                if self.config.case_insensitive_headers {
                    h.eq_ignore_ascii_case(wanted)
                } else {
                    h == wanted
                }
            })
        };

        let columns = &self.config.columns;
        let found = [
            find(&columns.longitude),
            find(&columns.latitude),
            find(&columns.value),
        ];

        match found {
            [Some(longitude), Some(latitude), Some(value)] => Ok(ColumnIndex {
                longitude,
                latitude,
                value,
            }),
            _ => {
                let missing = columns
                    .as_array()
                    .iter()
                    .zip(found)
                    .filter(|(_, position)| position.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect();
                Err(IngestionError::MissingColumns {
                    missing,
                    found: headers.to_vec(),
                })
            }
        }
    }
}
