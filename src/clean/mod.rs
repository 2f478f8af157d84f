// src/clean/mod.rs

pub mod dates;
pub mod status;

use crate::error::EtlError;
use crate::table::{Table, Value};
use self::status::derive_status;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

// Raw input columns the cleaner operates on. Anything else passes through
// untouched.
pub const COUNTRY: &str = "Country";
pub const REGISTRATION_DATE: &str = "Registration_Date";
pub const CAMPAIGN_START_DATE: &str = "Campaign_Start_Date";
pub const CAMPAIGN_END_DATE: &str = "Campaign_End_Date";
pub const ATTENDANCE_DATE: &str = "Attendance_Date";
pub const REGISTERED: &str = "Registered";
pub const ATTENDED: &str = "Attended";
pub const CAMPAIGN_NAME: &str = "Campaign_Name";

pub const DATE_COLUMNS: &[&str] = &[
    REGISTRATION_DATE,
    CAMPAIGN_START_DATE,
    CAMPAIGN_END_DATE,
    ATTENDANCE_DATE,
];
pub const BOOL_COLUMNS: &[&str] = &[REGISTERED, ATTENDED];

// Columns the cleaner derives.
pub const REGISTRATION_MONTH: &str = "Registration_Month";
pub const ATTENDANCE_MONTH: &str = "Attendance_Month";
pub const CAMPAIGN_DURATION_DAYS: &str = "Campaign_Duration_Days";
pub const ATTENDANCE_STATUS: &str = "Attendance_Status";

/// Quality metrics computed at the end of cleaning. Logged for operators and
/// returned as data so tests can assert on values instead of log text.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanReport {
    pub total_rows: usize,
    pub distinct_countries_before: usize,
    pub distinct_countries_after: usize,
    /// Rows with `Registered == true`.
    pub registered: usize,
    /// Rows with a present `Attendance_Date`.
    pub attended: usize,
    /// `Attendance_Status` label -> row count.
    pub status_counts: BTreeMap<String, usize>,
}

impl CleanReport {
    pub fn registered_pct(&self) -> f64 {
        pct(self.registered, self.total_rows)
    }

    pub fn attended_pct(&self) -> f64 {
        pct(self.attended, self.total_rows)
    }
}

fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Normalize the raw table and append the derived columns.
///
/// Row count is preserved: malformed cell values degrade to
/// `Value::Missing` / `false` instead of dropping the row or failing the run.
/// The only fatal outcome is a required column missing from the header.
pub fn clean(mut table: Table) -> Result<(Table, CleanReport), EtlError> {
    // Resolve every required column up front so a schema problem surfaces
    // before any mutation.
    let country_idx = table.require_column(COUNTRY)?;
    let date_idx: Vec<usize> = DATE_COLUMNS
        .iter()
        .map(|c| table.require_column(c))
        .collect::<Result<_, _>>()?;
    let bool_idx: Vec<usize> = BOOL_COLUMNS
        .iter()
        .map(|c| table.require_column(c))
        .collect::<Result<_, _>>()?;

    let countries_before = distinct_values(&table, country_idx);
    normalize_country(&mut table, country_idx);
    let countries_after = distinct_values(&table, country_idx);
    info!("countries: {countries_before} -> {countries_after} distinct");

    for (name, &idx) in DATE_COLUMNS.iter().zip(&date_idx) {
        coerce_dates(&mut table, name, idx);
    }
    info!("{} date columns coerced", DATE_COLUMNS.len());

    for &idx in &bool_idx {
        coerce_bools(&mut table, idx);
    }
    info!("boolean columns normalized: {}", BOOL_COLUMNS.join(", "));

    derive_columns(&mut table)?;
    info!(
        "derived columns: {REGISTRATION_MONTH}, {ATTENDANCE_MONTH}, \
         {CAMPAIGN_DURATION_DAYS}, {ATTENDANCE_STATUS}"
    );

    let report = build_report(&table, countries_before, countries_after)?;
    log_report(&report);
    Ok((table, report))
}

/// Trim surrounding whitespace, upper-case the first character, lower-case
/// the rest. Applying it twice yields the same value.
pub fn capitalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

/// Total over every input representation; nothing reaches an error path.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(n) => *n == 1,
        Value::Float(x) => *x == 1.0,
        Value::Text(s) => matches!(s.trim().to_lowercase().as_str(), "yes" | "true" | "1"),
        Value::Date(_) | Value::Missing => false,
    }
}

fn normalize_country(table: &mut Table, idx: usize) {
    for row in &mut table.rows {
        if let Value::Text(s) = &row[idx] {
            row[idx] = Value::Text(capitalize(s));
        }
    }
}

fn coerce_dates(table: &mut Table, column: &str, idx: usize) {
    for row in &mut table.rows {
        let coerced = match &row[idx] {
            Value::Date(d) => Value::Date(*d),
            Value::Missing => Value::Missing,
            Value::Text(s) => match dates::parse_date(s) {
                Some(d) => Value::Date(d),
                None => {
                    debug!("unparseable {column} value {s:?}, treating as missing");
                    Value::Missing
                }
            },
            other => {
                debug!("non-date {column} value {other:?}, treating as missing");
                Value::Missing
            }
        };
        row[idx] = coerced;
    }
}

fn coerce_bools(table: &mut Table, idx: usize) {
    for row in &mut table.rows {
        row[idx] = Value::Bool(truthy(&row[idx]));
    }
}

fn derive_columns(table: &mut Table) -> Result<(), EtlError> {
    let reg_date = table.require_column(REGISTRATION_DATE)?;
    let att_date = table.require_column(ATTENDANCE_DATE)?;
    let start = table.require_column(CAMPAIGN_START_DATE)?;
    let end = table.require_column(CAMPAIGN_END_DATE)?;
    let registered = table.require_column(REGISTERED)?;

    let reg_months = month_column(table, reg_date);
    let att_months = month_column(table, att_date);

    let durations: Vec<Value> = table
        .rows
        .iter()
        .map(|row| match (row[end].as_date(), row[start].as_date()) {
            (Some(e), Some(s)) => Value::Int((e - s).num_days()),
            _ => Value::Missing,
        })
        .collect();

    let statuses: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let is_registered = matches!(row[registered], Value::Bool(true));
            let status = derive_status(is_registered, row[att_date].as_date());
            Value::Text(status.to_string())
        })
        .collect();

    table.set_column(REGISTRATION_MONTH, reg_months);
    table.set_column(ATTENDANCE_MONTH, att_months);
    table.set_column(CAMPAIGN_DURATION_DAYS, durations);
    table.set_column(ATTENDANCE_STATUS, statuses);
    Ok(())
}

fn month_column(table: &Table, idx: usize) -> Vec<Value> {
    table
        .rows
        .iter()
        .map(|row| match row[idx].as_date() {
            Some(d) => Value::Text(dates::month_label(d)),
            None => Value::Missing,
        })
        .collect()
}

fn distinct_values(table: &Table, idx: usize) -> usize {
    table
        .column(idx)
        .filter(|v| !v.is_missing())
        .map(|v| v.to_string())
        .collect::<BTreeSet<_>>()
        .len()
}

fn build_report(
    table: &Table,
    countries_before: usize,
    countries_after: usize,
) -> Result<CleanReport, EtlError> {
    let registered_idx = table.require_column(REGISTERED)?;
    let att_date_idx = table.require_column(ATTENDANCE_DATE)?;
    let status_idx = table.require_column(ATTENDANCE_STATUS)?;

    let registered = table
        .column(registered_idx)
        .filter(|v| matches!(v, Value::Bool(true)))
        .count();
    let attended = table
        .column(att_date_idx)
        .filter(|v| !v.is_missing())
        .count();

    let mut status_counts = BTreeMap::new();
    for value in table.column(status_idx) {
        *status_counts.entry(value.to_string()).or_insert(0) += 1;
    }

    Ok(CleanReport {
        total_rows: table.n_rows(),
        distinct_countries_before: countries_before,
        distinct_countries_after: countries_after,
        registered,
        attended,
        status_counts,
    })
}

fn log_report(report: &CleanReport) {
    info!("total records: {}", report.total_rows);
    info!(
        "registered: {} ({:.1}%)",
        report.registered,
        report.registered_pct()
    );
    info!(
        "attended: {} ({:.1}%)",
        report.attended,
        report.attended_pct()
    );
    info!("attendance status distribution:");
    for (label, count) in &report.status_counts {
        info!("  - {label}: {count} ({:.1}%)", pct(*count, report.total_rows));
    }
}
