use chrono::{NaiveDate, NaiveDateTime};

/// Formats tried against free-text date cells, most common first. Slashed
/// dates are read month-first before day-first, matching the source feed.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y", "%B %d, %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Best-effort parse of a free-text date. Returns `None` rather than failing:
/// an unparseable cell degrades to the missing sentinel upstream.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim().trim_matches('"');
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    // Timestamps carry a date up front; the time of day is discarded.
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Human-readable month-year label, e.g. `January 2024`.
pub fn month_label(d: NaiveDate) -> String {
    d.format("%B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_common_formats() {
        assert_eq!(parse_date("2024-01-15"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("2024/01/15"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("01/15/2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("January 15, 2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("15 January 2024"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn truncates_timestamps_to_the_date() {
        assert_eq!(parse_date("2024-01-15 09:30:00"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("2024-01-15T09:30:00"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn tolerates_whitespace_and_quotes() {
        assert_eq!(parse_date("  2024-01-15  "), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("\"2024/01/15\""), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn garbage_is_none_not_an_error() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2024-13-45"), None);
    }

    #[test]
    fn month_label_is_full_month_and_year() {
        assert_eq!(month_label(ymd(2024, 1, 15)), "January 2024");
        assert_eq!(month_label(ymd(2023, 12, 1)), "December 2023");
    }
}
