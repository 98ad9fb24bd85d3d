//! Decoding of exported application sheets into a [`RawTable`].
//!
//! Two export shapes are understood: delimited text (CSV/TSV) and the JSON
//! returned by a spreadsheet service's `values.get` call. Either way the first
//! row is a header by default and is discarded; columns are bound by position
//! later on, so header text never matters.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use jobtrack_core::error::{Result, TrackerError};
use jobtrack_core::models::{Cell, RawRow, RawTable};
use serde_json::Value;
use tracing::{debug, warn};

// ── Options ───────────────────────────────────────────────────────────────────

/// On-disk encoding of a sheet export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Resolve a CLI format name. `"auto"` (or anything unrecognised) picks
    /// JSON for `.json` files and CSV for everything else.
    pub fn resolve(name: &str, path: &Path) -> Self {
        match name {
            "csv" => InputFormat::Csv,
            "json" => InputFormat::Json,
            _ => {
                let is_json = path
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("json"))
                    .unwrap_or(false);
                if is_json {
                    InputFormat::Json
                } else {
                    InputFormat::Csv
                }
            }
        }
    }
}

/// How to decode an export.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub format: InputFormat,
    /// Discard the first row.
    pub has_header: bool,
    /// CSV field delimiter; ignored for JSON.
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            format: InputFormat::Csv,
            has_header: true,
            delimiter: b',',
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read and decode the export at `path`.
pub fn load_table(path: &Path, options: &ReadOptions) -> Result<RawTable> {
    let file = std::fs::File::open(path).map_err(|source| TrackerError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let table = match options.format {
        InputFormat::Csv => parse_csv(file, options.has_header, options.delimiter)?,
        InputFormat::Json => {
            let value: Value = serde_json::from_reader(std::io::BufReader::new(file))?;
            parse_sheet_values(&value, options.has_header)?
        }
    };

    debug!(
        "Read {} rows x {} columns from {}",
        table.len(),
        table.width(),
        path.display()
    );
    Ok(table)
}

/// Decode delimited text. Fields are kept verbatim; empty fields are blank.
pub fn parse_csv<R: Read>(reader: R, has_header: bool, delimiter: u8) -> Result<RawTable> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows: Vec<RawRow> = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from).collect());
    }

    Ok(into_table(rows, has_header))
}

/// Decode sheet values JSON: either `{"values": [[...], ...]}` or a bare
/// array of rows.
pub fn parse_sheet_values(value: &Value, has_header: bool) -> Result<RawTable> {
    let grid = match value {
        Value::Array(rows) => rows,
        Value::Object(map) => match map.get("values") {
            Some(Value::Array(rows)) => rows,
            // An empty sheet comes back without a `values` key at all.
            None => return Ok(RawTable::default()),
            Some(_) => {
                return Err(TrackerError::InvalidSheet(
                    "`values` must be an array of rows".to_string(),
                ))
            }
        },
        _ => {
            return Err(TrackerError::InvalidSheet(
                "expected an object with `values` or an array of rows".to_string(),
            ))
        }
    };

    let mut rows: Vec<RawRow> = Vec::with_capacity(grid.len());
    for (index, row) in grid.iter().enumerate() {
        let Value::Array(cells) = row else {
            return Err(TrackerError::InvalidSheet(format!(
                "row {} is not an array",
                index + 1
            )));
        };
        rows.push(cells.iter().map(json_cell).collect());
    }

    Ok(into_table(rows, has_header))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Split off the header (whose width defines the table) or size the table by
/// its widest row.
fn into_table(mut rows: Vec<RawRow>, has_header: bool) -> RawTable {
    if !has_header {
        return RawTable::from_rows(rows);
    }
    if rows.is_empty() {
        warn!("Sheet has no header row");
        return RawTable::default();
    }
    let header = rows.remove(0);
    RawTable::new(header.len(), rows)
}

fn json_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Blank,
        Value::String(s) => Cell::from(s.as_str()),
        Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or_default(),
        Value::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
