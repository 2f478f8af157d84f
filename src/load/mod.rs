// src/load/mod.rs

use crate::error::EtlError;
use crate::table::{Table, Value};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::path::Path;
use tracing::info;

pub const DEFAULT_SHEET: &str = "Sheet1";

/// Load one worksheet of `path` into a `Table`.
///
/// The first row of the sheet is the header; every following row becomes one
/// record, in sheet order. Any read failure (missing file, corrupt workbook,
/// missing sheet, empty sheet) is fatal; no partial load is accepted.
pub fn load_workbook(path: &Path, sheet: &str) -> Result<Table, EtlError> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| EtlError::load(path, e))?;
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| EtlError::load(path, e))?;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| c.to_string().trim().to_string())
            .collect(),
        None => {
            return Err(EtlError::load(
                path,
                format!("worksheet `{sheet}` has no header row"),
            ))
        }
    };

    let mut table = Table::new(headers);
    for sheet_row in sheet_rows {
        let mut cells: Vec<Value> = sheet_row.iter().map(cell_to_value).collect();
        cells.resize(table.n_cols(), Value::Missing);
        cells.truncate(table.n_cols());
        table.rows.push(cells);
    }

    info!(
        "loaded {}: {} rows x {} columns",
        path.display(),
        table.n_rows(),
        table.n_cols()
    );
    info!("columns: {}", table.headers.join(", "));
    Ok(table)
}

/// Map one spreadsheet cell to a typed `Value`. Cells the workbook already
/// types (numbers, booleans, date-formatted cells) keep their type; anything
/// unreadable becomes the missing sentinel.
fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Missing,
        Data::String(s) if s.trim().is_empty() => Value::Missing,
        Data::String(s) => Value::Text(s.clone()),
        Data::Int(n) => Value::Int(*n),
        Data::Float(x) => Value::Float(*x),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => Value::Date(ndt.date()),
            None => Value::Missing,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
    }
}
