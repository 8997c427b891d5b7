use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::a001_sales_record::SalesRecord;

/// Selector value meaning "no restriction"
pub const ALL: &str = "all";

fn all() -> String {
    ALL.to_string()
}

/// Date window of the filter: everything, or the last N days from now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateRange {
    #[default]
    All,
    LastDays(u32),
}

impl FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == ALL {
            return Ok(DateRange::All);
        }
        s.parse::<u32>()
            .map(DateRange::LastDays)
            .map_err(|_| format!("Invalid date range '{}': expected \"all\" or a number of days", s))
    }
}

impl TryFrom<String> for DateRange {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateRange> for String {
    fn from(value: DateRange) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateRange::All => f.write_str(ALL),
            DateRange::LastDays(days) => write!(f, "{}", days),
        }
    }
}

/// Current selection of visible records.
///
/// Every dimension is either `"all"` or an exact label; all active dimensions
/// must match. Missing query parameters default to `"all"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default = "all")]
    pub category: String,
    #[serde(default = "all")]
    pub region: String,
    #[serde(default = "all")]
    pub product: String,
    #[serde(default)]
    pub date_range: DateRange,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: all(),
            region: all(),
            product: all(),
            date_range: DateRange::All,
        }
    }
}

fn label_matches(selected: &str, actual: &str) -> bool {
    selected == ALL || selected == actual
}

impl FilterState {
    /// Number of dimensions that restrict the selection
    pub fn active_count(&self) -> usize {
        [&self.category, &self.region, &self.product]
            .iter()
            .filter(|v| v.as_str() != ALL)
            .count()
            + usize::from(self.date_range != DateRange::All)
    }

    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }

    /// Does `record` pass the filter at instant `now`?
    ///
    /// With a day window active, a record whose date does not parse never
    /// matches. Days are fixed 24h spans counted back from `now`.
    pub fn matches(&self, record: &SalesRecord, now: DateTime<Utc>) -> bool {
        if !label_matches(&self.category, &record.category)
            || !label_matches(&self.region, &record.region)
            || !label_matches(&self.product, &record.product)
        {
            return false;
        }

        match self.date_range {
            DateRange::All => true,
            DateRange::LastDays(days) => match record.parsed_date() {
                // a window reaching past the calendar range has no lower bound
                Some(date) => now
                    .naive_utc()
                    .checked_sub_signed(Duration::days(i64::from(days)))
                    .map_or(true, |cutoff| date >= cutoff),
                None => false,
            },
        }
    }

    /// Matching records, input order preserved
    pub fn apply(&self, records: &[SalesRecord], now: DateTime<Utc>) -> Vec<SalesRecord> {
        records
            .iter()
            .filter(|r| self.matches(r, now))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_sales_record::SalesRecordId;
    use chrono::TimeZone;

    fn record(date: &str, product: &str, category: &str, region: &str) -> SalesRecord {
        SalesRecord {
            id: SalesRecordId::new_v4(),
            date: date.to_string(),
            product: product.to_string(),
            category: category.to_string(),
            region: region.to_string(),
            customer_type: None,
            quantity: 1.0,
            revenue: 100.0,
            cost: 0.0,
            profit: 100.0,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_default_matches_everything() {
        let filter = FilterState::default();
        assert!(!filter.is_active());
        assert!(filter.matches(&record("2024-01-01", "A", "X", "North"), now()));
        assert!(filter.matches(&record("garbage", "A", "X", "North"), now()));
    }

    #[test]
    fn test_last_30_days() {
        let filter = FilterState {
            date_range: DateRange::LastDays(30),
            ..FilterState::default()
        };
        let records = vec![
            record("2024-01-01", "A", "X", "North"),
            record("2024-06-01", "B", "X", "North"),
        ];
        let kept = filter.apply(&records, now());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].product, "B");
    }

    #[test]
    fn test_cutoff_is_inclusive() {
        let filter = FilterState {
            date_range: DateRange::LastDays(7),
            ..FilterState::default()
        };
        assert!(filter.matches(&record("2024-05-26", "A", "X", "N"), now()));
        assert!(!filter.matches(&record("2024-05-25T23:59:59", "A", "X", "N"), now()));
    }

    #[test]
    fn test_huge_day_count_has_no_lower_bound() {
        let filter: FilterState =
            serde_json::from_str(r#"{"date_range":"100000000"}"#).unwrap();
        assert!(filter.matches(&record("0001-01-01", "A", "X", "N"), Utc::now()));
        assert!(filter.matches(&record("2024-06-01", "A", "X", "N"), now()));
        assert!(!filter.matches(&record("garbage", "A", "X", "N"), now()));

        let widest = FilterState {
            date_range: DateRange::LastDays(u32::MAX),
            ..FilterState::default()
        };
        assert_eq!(widest.apply(&[record("1999-12-31", "A", "X", "N")], now()).len(), 1);
    }

    #[test]
    fn test_unparseable_date_excluded_only_with_window() {
        let r = record("yesterday", "A", "X", "N");
        let mut filter = FilterState::default();
        assert!(filter.matches(&r, now()));
        filter.date_range = DateRange::LastDays(365);
        assert!(!filter.matches(&r, now()));
    }

    #[test]
    fn test_label_filters_are_exact_and_combined() {
        let filter = FilterState {
            category: "Electronics".to_string(),
            region: "North".to_string(),
            ..FilterState::default()
        };
        assert_eq!(filter.active_count(), 2);
        assert!(filter.matches(&record("2024-01-01", "A", "Electronics", "North"), now()));
        assert!(!filter.matches(&record("2024-01-01", "A", "Electronics", "South"), now()));
        assert!(!filter.matches(&record("2024-01-01", "A", "electronics", "North"), now()));
    }

    #[test]
    fn test_date_range_parsing() {
        assert_eq!("all".parse::<DateRange>(), Ok(DateRange::All));
        assert_eq!("90".parse::<DateRange>(), Ok(DateRange::LastDays(90)));
        assert!("ninety".parse::<DateRange>().is_err());
        assert!("-7".parse::<DateRange>().is_err());
        assert_eq!(DateRange::LastDays(7).to_string(), "7");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let filter: FilterState =
            serde_json::from_str(r#"{"region":"West","date_range":"30"}"#).unwrap();
        assert_eq!(filter.category, ALL);
        assert_eq!(filter.region, "West");
        assert_eq!(filter.date_range, DateRange::LastDays(30));
        assert!(serde_json::from_str::<FilterState>(r#"{"date_range":"soon"}"#).is_err());
    }
}
