// src/summary/mod.rs

use crate::clean::{ATTENDANCE_DATE, CAMPAIGN_NAME, COUNTRY, REGISTERED, REGISTRATION_MONTH};
use crate::error::EtlError;
use crate::table::{Table, Value};
use std::collections::BTreeMap;
use tracing::info;

/// Bucket label for rows whose grouping value is missing. Keeping the bucket
/// (instead of dropping the rows) preserves the row count across every
/// summary.
pub const UNKNOWN_GROUP: &str = "Unknown";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignStats {
    /// Rows with `Registered == true`.
    pub registered: usize,
    /// Rows with a present `Attendance_Date`.
    pub attended: usize,
}

/// The three independent group-by views over the cleaned table. `BTreeMap`
/// keys give a deterministic order; none of the counts depend on row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summaries {
    pub campaigns: BTreeMap<String, CampaignStats>,
    pub countries: BTreeMap<String, usize>,
    /// Registrations per `Registration_Month` label.
    pub monthly: BTreeMap<String, usize>,
}

pub fn summarize(table: &Table) -> Result<Summaries, EtlError> {
    let summaries = Summaries {
        campaigns: campaign_summary(table)?,
        countries: count_by(table, COUNTRY)?,
        monthly: count_by(table, REGISTRATION_MONTH)?,
    };
    info!(
        "summaries: {} campaigns, {} countries, {} months",
        summaries.campaigns.len(),
        summaries.countries.len(),
        summaries.monthly.len()
    );
    Ok(summaries)
}

fn group_key(value: &Value) -> String {
    if value.is_missing() {
        UNKNOWN_GROUP.to_string()
    } else {
        value.to_string()
    }
}

fn count_by(table: &Table, column: &str) -> Result<BTreeMap<String, usize>, EtlError> {
    let idx = table.require_column(column)?;
    let mut counts = BTreeMap::new();
    for row in &table.rows {
        *counts.entry(group_key(&row[idx])).or_insert(0) += 1;
    }
    Ok(counts)
}

fn campaign_summary(table: &Table) -> Result<BTreeMap<String, CampaignStats>, EtlError> {
    let name_idx = table.require_column(CAMPAIGN_NAME)?;
    let reg_idx = table.require_column(REGISTERED)?;
    let att_idx = table.require_column(ATTENDANCE_DATE)?;

    let mut campaigns: BTreeMap<String, CampaignStats> = BTreeMap::new();
    for row in &table.rows {
        let stats = campaigns.entry(group_key(&row[name_idx])).or_default();
        if matches!(row[reg_idx], Value::Bool(true)) {
            stats.registered += 1;
        }
        if !row[att_idx].is_missing() {
            stats.attended += 1;
        }
    }
    Ok(campaigns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> Value {
        Value::Text(s.into())
    }

    fn date(y: i32, m: u32, d: u32) -> Value {
        Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    /// Minimal cleaned-shape table: only the columns the aggregator touches.
    fn cleaned_table(rows: Vec<Vec<Value>>) -> Table {
        let mut t = Table::new(
            [
                CAMPAIGN_NAME,
                COUNTRY,
                REGISTRATION_MONTH,
                REGISTERED,
                ATTENDANCE_DATE,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        );
        t.rows = rows;
        t
    }

    #[test]
    fn country_counts_after_normalization() {
        // Post-normalization ["Usa", "Usa", "Uk"] -> {Usa: 2, Uk: 1}.
        let table = cleaned_table(vec![
            vec![text("A"), text("Usa"), text("January 2024"), Value::Bool(true), Value::Missing],
            vec![text("A"), text("Usa"), text("January 2024"), Value::Bool(false), Value::Missing],
            vec![text("B"), text("Uk"), text("February 2024"), Value::Bool(true), date(2024, 2, 2)],
        ]);

        let summaries = summarize(&table).unwrap();
        assert_eq!(summaries.countries.get("Usa"), Some(&2));
        assert_eq!(summaries.countries.get("Uk"), Some(&1));
        assert_eq!(summaries.countries.len(), 2);
    }

    #[test]
    fn campaign_attended_never_exceeds_row_count() {
        let table = cleaned_table(vec![
            vec![text("A"), text("Usa"), text("January 2024"), Value::Bool(true), date(2024, 1, 9)],
            vec![text("A"), text("Usa"), text("January 2024"), Value::Bool(true), Value::Missing],
            vec![text("A"), text("Uk"), text("January 2024"), Value::Bool(false), date(2024, 1, 12)],
        ]);

        let summaries = summarize(&table).unwrap();
        let a = summaries.campaigns.get("A").unwrap();
        assert_eq!(a.registered, 2);
        assert_eq!(a.attended, 2);
        assert!(a.attended <= 3);
    }

    #[test]
    fn no_campaign_invented_or_dropped() {
        let table = cleaned_table(vec![
            vec![text("A"), text("Usa"), text("January 2024"), Value::Bool(false), Value::Missing],
            vec![text("B"), text("Usa"), text("January 2024"), Value::Bool(false), Value::Missing],
        ]);

        let summaries = summarize(&table).unwrap();
        let names: Vec<&String> = summaries.campaigns.keys().collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn missing_month_goes_to_unknown_bucket() {
        let table = cleaned_table(vec![
            vec![text("A"), text("Usa"), Value::Missing, Value::Bool(true), Value::Missing],
            vec![text("A"), text("Usa"), text("March 2024"), Value::Bool(true), Value::Missing],
        ]);

        let summaries = summarize(&table).unwrap();
        assert_eq!(summaries.monthly.get(UNKNOWN_GROUP), Some(&1));
        assert_eq!(summaries.monthly.get("March 2024"), Some(&1));
        let total: usize = summaries.monthly.values().sum();
        assert_eq!(total, table.n_rows(), "no row may be dropped from a summary");
    }

    #[test]
    fn absent_grouping_column_is_a_schema_error() {
        let table = Table::new(vec![COUNTRY.to_string()]);
        let err = summarize(&table).unwrap_err();
        assert!(matches!(err, EtlError::Schema(_)));
    }
}
