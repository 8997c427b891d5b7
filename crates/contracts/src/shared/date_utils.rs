//! Calendar date handling for uploaded sales data.
//!
//! Uploaded files use a handful of "ISO-ish" spellings. Everything is read as
//! UTC; a value without a time of day is midnight.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a sales date into a UTC timestamp.
/// Returns `None` for anything that is not a valid calendar date.
pub fn parse_sales_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Calendar day of a sales date, time of day dropped.
pub fn sales_day(value: &str) -> Option<NaiveDate> {
    parse_sales_date(value).map(|dt| dt.date())
}

/// Normalize a sales date to `YYYY-MM-DD`
/// Example: "01/15/2024" -> "2024-01-15"
pub fn normalize_sales_date(value: &str) -> Option<String> {
    sales_day(value).map(format_day)
}

pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_iso_date() {
        let dt = parse_sales_date("2024-01-15").unwrap();
        assert_eq!(format_day(dt.date()), "2024-01-15");
        assert_eq!(dt.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_alternative_spellings() {
        assert_eq!(normalize_sales_date("2024/03/05").as_deref(), Some("2024-03-05"));
        assert_eq!(normalize_sales_date("03/05/2024").as_deref(), Some("2024-03-05"));
        assert_eq!(
            normalize_sales_date("2024-03-05T18:30:00").as_deref(),
            Some("2024-03-05")
        );
        assert_eq!(
            normalize_sales_date("2024-03-05 18:30:00").as_deref(),
            Some("2024-03-05")
        );
        assert_eq!(
            normalize_sales_date("2024-03-05T23:30:00+00:00").as_deref(),
            Some("2024-03-05")
        );
    }

    #[test]
    fn test_rfc3339_offset_is_shifted_to_utc() {
        assert_eq!(
            normalize_sales_date("2024-03-05T01:00:00+03:00").as_deref(),
            Some("2024-03-04")
        );
    }

    #[test]
    fn test_invalid_dates() {
        assert!(parse_sales_date("").is_none());
        assert!(parse_sales_date("   ").is_none());
        assert!(parse_sales_date("not a date").is_none());
        assert!(parse_sales_date("2024-13-01").is_none());
        assert!(parse_sales_date("2023-02-29").is_none());
    }
}
