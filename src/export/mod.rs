// src/export/mod.rs

use crate::clean::{ATTENDED, REGISTERED};
use crate::error::EtlError;
use crate::table::{Table, Value};
use rust_xlsxwriter::Workbook;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

pub const XLSX_FILE: &str = "propel_cleaned_data.xlsx";
pub const CSV_FILE: &str = "propel_cleaned_data.csv";
pub const SHEET_NAME: &str = "Data";

/// Where the cleaned table landed, with on-disk sizes in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifacts {
    pub xlsx: PathBuf,
    pub xlsx_bytes: u64,
    pub csv: PathBuf,
    pub csv_bytes: u64,
}

/// Write the cleaned table to both sinks under `out_dir`, creating the
/// directory if absent. Both artifacts carry the identical logical content;
/// boolean columns go out as `"True"`/`"False"` text.
pub fn export(table: &Table, out_dir: &Path) -> Result<ExportArtifacts, EtlError> {
    fs::create_dir_all(out_dir).map_err(|e| EtlError::export(out_dir, e))?;

    let table = stringify_bools(table.clone());

    let xlsx = out_dir.join(XLSX_FILE);
    write_xlsx(&table, &xlsx)?;
    let csv = out_dir.join(CSV_FILE);
    write_csv(&table, &csv)?;

    let artifacts = ExportArtifacts {
        xlsx_bytes: file_size(&xlsx)?,
        csv_bytes: file_size(&csv)?,
        xlsx,
        csv,
    };
    info!(
        "xlsx: {} ({:.1} KB)",
        artifacts.xlsx.display(),
        artifacts.xlsx_bytes as f64 / 1024.0
    );
    info!(
        "csv: {} ({:.1} KB)",
        artifacts.csv.display(),
        artifacts.csv_bytes as f64 / 1024.0
    );
    Ok(artifacts)
}

/// Boolean columns are rendered to text before serialization so both sinks
/// agree on the representation.
pub fn stringify_bools(mut table: Table) -> Table {
    for name in [REGISTERED, ATTENDED] {
        if let Some(idx) = table.column_index(name) {
            for row in &mut table.rows {
                if let Value::Bool(_) = row[idx] {
                    row[idx] = Value::Text(row[idx].to_string());
                }
            }
        }
    }
    table
}

fn write_xlsx(table: &Table, path: &Path) -> Result<(), EtlError> {
    let mut workbook = build_workbook(table).map_err(|e| EtlError::export(path, e))?;
    workbook.save(path).map_err(|e| EtlError::export(path, e))
}

fn build_workbook(table: &Table) -> Result<Workbook, rust_xlsxwriter::XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (c, header) in table.headers.iter().enumerate() {
        sheet.write_string(0, c as u16, header.as_str())?;
    }
    for (r, row) in table.rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (row_i, col_i) = ((r + 1) as u32, c as u16);
            match cell {
                Value::Missing => {}
                Value::Int(n) => {
                    sheet.write_number(row_i, col_i, *n as f64)?;
                }
                Value::Float(x) => {
                    sheet.write_number(row_i, col_i, *x)?;
                }
                other => {
                    sheet.write_string(row_i, col_i, other.to_string())?;
                }
            }
        }
    }
    Ok(workbook)
}

fn write_csv(table: &Table, path: &Path) -> Result<(), EtlError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| EtlError::export(path, e))?;
    writer
        .write_record(&table.headers)
        .map_err(|e| EtlError::export(path, e))?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(Value::to_string))
            .map_err(|e| EtlError::export(path, e))?;
    }
    writer.flush().map_err(|e| EtlError::export(path, e))
}

fn file_size(path: &Path) -> Result<u64, EtlError> {
    let metadata = fs::metadata(path).map_err(|e| EtlError::export(path, e))?;
    Ok(metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::{ATTENDANCE_DATE, CAMPAIGN_NAME, COUNTRY};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn text(s: &str) -> Value {
        Value::Text(s.into())
    }

    fn cleaned_table() -> Table {
        let mut t = Table::new(
            [COUNTRY, CAMPAIGN_NAME, REGISTERED, ATTENDED, ATTENDANCE_DATE]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        t.rows.push(vec![
            text("Usa"),
            text("Launch"),
            Value::Bool(true),
            Value::Bool(false),
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()),
        ]);
        t.rows.push(vec![
            text("Uk"),
            text("Launch"),
            Value::Bool(false),
            Value::Bool(false),
            Value::Missing,
        ]);
        t
    }

    #[test]
    fn booleans_are_stringified_only_in_their_columns() {
        let out = stringify_bools(cleaned_table());
        assert_eq!(out.rows[0][2], text("True"));
        assert_eq!(out.rows[0][3], text("False"));
        // Non-boolean columns are untouched.
        assert_eq!(out.rows[0][0], text("Usa"));
        assert_eq!(
            out.rows[0][4],
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap())
        );
    }

    #[test]
    fn csv_round_trip_preserves_rows_and_bool_strings() {
        let dir = TempDir::new().unwrap();
        let table = cleaned_table();
        let artifacts = export(&table, dir.path()).unwrap();

        let mut reader = csv::Reader::from_path(&artifacts.csv).unwrap();
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            table.headers.iter().map(String::as_str).collect::<Vec<_>>()
        );
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), table.n_rows());
        assert_eq!(&records[0][2], "True");
        assert_eq!(&records[1][2], "False");
        assert_eq!(&records[0][4], "2024-01-20");
        assert_eq!(&records[1][4], "");
    }

    #[test]
    fn xlsx_artifact_reads_back_through_the_loader() {
        let dir = TempDir::new().unwrap();
        let table = cleaned_table();
        let artifacts = export(&table, dir.path()).unwrap();

        let reread = crate::load::load_workbook(&artifacts.xlsx, SHEET_NAME).unwrap();
        assert_eq!(reread.headers, table.headers);
        assert_eq!(reread.n_rows(), table.n_rows());
        assert_eq!(reread.rows[0][2], text("True"));
    }

    #[test]
    fn output_directory_is_created_and_reusable() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let table = cleaned_table();

        let first = export(&table, &nested).unwrap();
        assert!(first.xlsx.exists());
        assert!(first.csv.exists());
        assert!(first.csv_bytes > 0);

        // Exporting again into the existing directory overwrites in place.
        let second = export(&table, &nested).unwrap();
        assert_eq!(second.csv_bytes, first.csv_bytes);
    }
}
