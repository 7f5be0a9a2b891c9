use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use calamine::{open_workbook_auto, Data, Range, Reader};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, RecordStore, RowRecord, VehicleRecord, COL_MODEL_YEAR};
use crate::config::DataSource;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything that can go wrong while reading one source file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reading workbook {path}: {source}")]
    Spreadsheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("workbook {0} has no sheets")]
    EmptyWorkbook(PathBuf),

    #[error("parsing JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("reading CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path}: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("{path}: missing '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(PathBuf),

    #[error("loader thread for {0} panicked")]
    Worker(PathBuf),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load every year file of `source`, one worker thread per file.
///
/// Records are concatenated in the configured file order. Any failing file
/// fails the whole load.
pub fn load_data_source(source: &DataSource) -> Result<RecordStore, LoadError> {
    let started = Instant::now();
    let paths = source.paths();

    let batches: Vec<Result<Vec<VehicleRecord>, LoadError>> = thread::scope(|scope| {
        let handles: Vec<_> = paths
            .iter()
            .map(|path| (path, scope.spawn(move || load_file(path))))
            .collect();

        handles
            .into_iter()
            .map(|(path, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(LoadError::Worker(path.clone())))
            })
            .collect()
    });

    let mut records = Vec::new();
    for (path, batch) in paths.iter().zip(batches) {
        let batch = batch?;
        log::debug!("{}: {} records", path.display(), batch.len());
        records.extend(batch);
    }

    log::info!(
        "Loaded {} records from {} files in {:?}",
        records.len(),
        paths.len(),
        started.elapsed()
    );
    Ok(RecordStore::from_records(records))
}

/// Load a single file into a store of its own.
pub fn load_store_from_file(path: &Path) -> anyhow::Result<RecordStore> {
    let records = load_file(path).with_context(|| format!("loading {}", path.display()))?;
    Ok(RecordStore::from_records(records))
}

/// Load vehicle records from one file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first sheet, header row first
/// * `.json` – `[{ "Model Year": 2023, "Mfr Name": "Toyota", ... }, ...]`
/// * `.csv`  – header row followed by one row per vehicle
pub fn load_file(path: &Path) -> Result<Vec<VehicleRecord>, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook_rows(path)?,
        "json" => read_json_rows(path)?,
        "csv" => read_csv_rows(path)?,
        _ => return Err(LoadError::UnsupportedExtension(path.to_path_buf())),
    };

    records_from_table(path, &table)
}

/// Rows of one source file together with the column names it declares.
#[derive(Debug, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RowRecord>,
}

/// Turn header-keyed rows into records, insisting on a model year column.
/// The header is checked even when the file has no data rows.
fn records_from_table(path: &Path, table: &RawTable) -> Result<Vec<VehicleRecord>, LoadError> {
    if !table.headers.iter().any(|h| h == COL_MODEL_YEAR) {
        return Err(LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: COL_MODEL_YEAR,
        });
    }
    Ok(table.rows.iter().map(VehicleRecord::from_row).collect())
}

// ---------------------------------------------------------------------------
// Workbook reader
// ---------------------------------------------------------------------------

fn read_workbook_rows(path: &Path) -> Result<RawTable, LoadError> {
    let spreadsheet_err = |source| LoadError::Spreadsheet {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(spreadsheet_err)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::EmptyWorkbook(path.to_path_buf()))?
        .map_err(spreadsheet_err)?;

    Ok(range_to_rows(&range))
}

/// First row is the header; every following row becomes one record.
/// Columns with a blank header are ignored.
pub fn range_to_rows(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return RawTable::default();
    };
    let columns: Vec<Option<String>> = header_row
        .iter()
        .map(|cell| cell_to_value(cell).as_text())
        .collect();

    let rows = rows
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .filter_map(|(i, header)| {
                    let header = header.as_ref()?;
                    let value = row.get(i).map(cell_to_value).unwrap_or(CellValue::Null);
                    Some((header.clone(), value))
                })
                .collect()
        })
        .collect();

    RawTable {
        headers: columns.into_iter().flatten().collect(),
        rows,
    }
}

fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (the usual sheet-to-JSON output):
///
/// ```json
/// [
///   { "Model Year": 2023, "Mfr Name": "Toyota", "Carline": "PRIUS", ... },
///   ...
/// ]
/// ```
fn read_json_rows(path: &Path) -> Result<RawTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let malformed = |reason: String| LoadError::Malformed {
        path: path.to_path_buf(),
        reason,
    };

    let records = root
        .as_array()
        .ok_or_else(|| malformed("expected top-level JSON array".to_string()))?;

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .ok_or_else(|| malformed(format!("row {i} is not a JSON object")))?;
            Ok(obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_cell(val)))
                .collect())
        })
        .collect::<Result<Vec<RowRecord>, LoadError>>()?;

    // Objects may carry different keys; the columns are their union.
    let headers: BTreeSet<String> = rows.iter().flat_map(|r| r.keys().cloned()).collect();
    Ok(RawTable {
        headers: headers.into_iter().collect(),
        rows,
    })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the source column names, one vehicle per row.
/// Cells stay text; numeric columns are parsed when the record is built.
fn read_csv_rows(path: &Path) -> Result<RawTable, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let row: RowRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.clone(), csv_cell(value)))
            .collect();
        rows.push(row);
    }
    Ok(RawTable { headers, rows })
}

fn csv_cell(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}
