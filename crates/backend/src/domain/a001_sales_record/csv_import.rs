//! Uploaded CSV text -> sales records.
//!
//! Columns are recognised by fuzzy header names. The format is plain
//! comma-separated text without quoting: a comma inside a value splits it.
//! Broken rows are dropped silently, the caller only sees fewer records.

use contracts::domain::a001_sales_record::{SalesRecord, SalesRecordId};
use contracts::shared::date_utils::parse_sales_date;

/// Record field a CSV column feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    Date,
    Product,
    Category,
    Region,
    Quantity,
    Revenue,
    Cost,
    Profit,
    CustomerType,
}

/// Classify a header by substring, first rule wins.
/// `header` must already be lower-cased and trimmed.
pub fn classify_header(header: &str) -> Option<FieldRole> {
    let has = |s: &str| header.contains(s);

    if has("date") {
        Some(FieldRole::Date)
    } else if has("product") && !has("category") {
        Some(FieldRole::Product)
    } else if has("category") {
        Some(FieldRole::Category)
    } else if has("region") {
        Some(FieldRole::Region)
    } else if has("quantity") || has("qty") {
        Some(FieldRole::Quantity)
    } else if has("revenue") || has("sales") {
        Some(FieldRole::Revenue)
    } else if has("cost") {
        Some(FieldRole::Cost)
    } else if has("profit") {
        Some(FieldRole::Profit)
    } else if has("customer") {
        Some(FieldRole::CustomerType)
    } else {
        None
    }
}

/// Unparseable, empty and non-finite numbers count as 0
fn parse_amount(value: &str) -> f64 {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Fields collected from one row before the validity check
#[derive(Debug, Default)]
struct RowDraft {
    date: Option<String>,
    product: Option<String>,
    category: Option<String>,
    region: Option<String>,
    customer_type: Option<String>,
    quantity: Option<f64>,
    revenue: Option<f64>,
    cost: Option<f64>,
    profit: Option<f64>,
}

impl RowDraft {
    fn set(&mut self, role: FieldRole, value: &str) {
        match role {
            // an unparseable date column never clears one read earlier
            FieldRole::Date => {
                if parse_sales_date(value).is_some() {
                    self.date = Some(value.to_string());
                }
            }
            FieldRole::Product => self.product = non_empty(value),
            FieldRole::Category => self.category = Some(value.to_string()),
            FieldRole::Region => self.region = Some(value.to_string()),
            FieldRole::CustomerType => self.customer_type = non_empty(value),
            FieldRole::Quantity => self.quantity = Some(parse_amount(value)),
            FieldRole::Revenue => self.revenue = Some(parse_amount(value)),
            FieldRole::Cost => self.cost = Some(parse_amount(value)),
            FieldRole::Profit => self.profit = Some(parse_amount(value)),
        }
    }

    /// A record needs date, product and revenue; revenue 0 is a real value.
    fn into_record(self) -> Option<SalesRecord> {
        let profit = match (self.profit, self.revenue, self.cost) {
            (Some(profit), _, _) => profit,
            (None, Some(revenue), Some(cost)) => revenue - cost,
            _ => 0.0,
        };

        Some(SalesRecord {
            id: SalesRecordId::new_v4(),
            date: self.date?,
            product: self.product?,
            revenue: self.revenue?,
            category: self.category.unwrap_or_default(),
            region: self.region.unwrap_or_default(),
            customer_type: self.customer_type,
            quantity: self.quantity.unwrap_or(0.0),
            cost: self.cost.unwrap_or(0.0),
            profit,
        })
    }
}

/// Parse uploaded CSV text into sales records.
///
/// The first non-blank line is the header. Rows with a different number of
/// fields than the header, or without a valid date, product or revenue, are
/// skipped. Returns an empty vector when there is no data line at all.
pub fn parse_sales_csv(csv_text: &str) -> Vec<SalesRecord> {
    // Strip UTF-8 BOM if present
    let text = csv_text.trim_start_matches('\u{FEFF}');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = reader.records().filter_map(|result| match result {
        Ok(row) => Some(row),
        Err(e) => {
            tracing::debug!("Skipping unreadable CSV line: {}", e);
            None
        }
    });

    let Some(header_row) = rows.find(|row| row.iter().any(|field| !field.is_empty())) else {
        return Vec::new();
    };

    let roles: Vec<Option<FieldRole>> = header_row
        .iter()
        .map(|h| classify_header(&h.to_lowercase()))
        .collect();

    tracing::debug!(
        "CSV headers: {:?} -> {:?}",
        header_row.iter().collect::<Vec<_>>(),
        roles
    );

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for row in rows {
        if row.len() != roles.len() {
            skipped += 1;
            continue;
        }

        let mut draft = RowDraft::default();
        for (role, value) in roles.iter().zip(row.iter()) {
            if let Some(role) = role {
                draft.set(*role, value);
            }
        }

        match draft.into_record() {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("CSV parse: {} rows kept, {} skipped", records.len(), skipped);
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_header_precedence() {
        assert_eq!(classify_header("date"), Some(FieldRole::Date));
        assert_eq!(classify_header("order date"), Some(FieldRole::Date));
        assert_eq!(classify_header("product name"), Some(FieldRole::Product));
        assert_eq!(classify_header("product category"), Some(FieldRole::Category));
        assert_eq!(classify_header("sales region"), Some(FieldRole::Region));
        assert_eq!(classify_header("qty"), Some(FieldRole::Quantity));
        assert_eq!(classify_header("net sales"), Some(FieldRole::Revenue));
        assert_eq!(classify_header("unit cost"), Some(FieldRole::Cost));
        assert_eq!(classify_header("gross profit"), Some(FieldRole::Profit));
        assert_eq!(classify_header("customer type"), Some(FieldRole::CustomerType));
        assert_eq!(classify_header("notes"), None);
    }

    #[test]
    fn test_single_row_with_derived_profit() {
        let text = "date,product,category,region,revenue,cost\n\
                    2024-01-15,Widget A,Electronics,North,5000,3000\n";
        let records = parse_sales_csv(text);
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.date, "2024-01-15");
        assert_eq!(r.product, "Widget A");
        assert_eq!(r.category, "Electronics");
        assert_eq!(r.region, "North");
        assert_eq!(r.revenue, 5000.0);
        assert_eq!(r.cost, 3000.0);
        assert_eq!(r.profit, 2000.0);
        assert_eq!(r.quantity, 0.0);
        assert_eq!(r.customer_type, None);
    }

    #[test]
    fn test_headers_are_case_insensitive_and_trimmed() {
        let text = " Order Date , PRODUCT ,Qty, Total Sales ,Customer Segment\n\
                    2024-02-01,Gadget,3,120.5,Retail";
        let records = parse_sales_csv(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].quantity, 3.0);
        assert_eq!(records[0].revenue, 120.5);
        assert_eq!(records[0].customer_type.as_deref(), Some("Retail"));
    }

    #[test]
    fn test_zero_revenue_is_kept() {
        let text = "date,product,revenue\n2024-03-01,Freebie,0\n";
        let records = parse_sales_csv(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].revenue, 0.0);
    }

    #[test]
    fn test_profit_not_derived_without_cost_column() {
        let text = "date,product,revenue\n2024-03-01,Widget,100\n";
        let records = parse_sales_csv(text);
        assert_eq!(records[0].profit, 0.0);
    }

    #[test]
    fn test_explicit_profit_wins_over_derived() {
        let text = "date,product,revenue,cost,profit\n2024-03-01,Widget,100,60,55\n";
        let records = parse_sales_csv(text);
        assert_eq!(records[0].profit, 55.0);
    }

    #[test]
    fn test_profit_derived_with_zero_revenue() {
        let text = "date,product,revenue,cost\n2024-03-01,Widget,0,25\n";
        let records = parse_sales_csv(text);
        assert_eq!(records[0].profit, -25.0);
    }

    #[test]
    fn test_field_count_mismatch_drops_only_that_row() {
        let text = "date,product,category,region,revenue\n\
                    2024-01-01,Widget, Inc,Tools,North,100\n\
                    2024-01-02,Gadget,Tools,South,200\n";
        let records = parse_sales_csv(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product, "Gadget");
    }

    #[test]
    fn test_invalid_rows_are_dropped() {
        let text = "date,product,revenue\n\
                    not-a-date,Widget,100\n\
                    2024-01-02,,100\n\
                    2024-01-03,Gizmo,abc\n\
                    2024-01-04,Doohickey,50\n";
        let records = parse_sales_csv(text);
        // bad date and missing product are dropped, bad number becomes 0
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product, "Gizmo");
        assert_eq!(records[0].revenue, 0.0);
        assert_eq!(records[1].product, "Doohickey");
    }

    #[test]
    fn test_blank_second_date_column_keeps_first() {
        let text = "order date,ship date,product,revenue\n\
                    2024-01-15,,Widget,100\n\
                    2024-01-16,2024-01-20,Gizmo,50\n\
                    ,2024-01-21,Doohickey,25\n";
        let records = parse_sales_csv(text);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, "2024-01-15");
        assert_eq!(records[1].date, "2024-01-20");
        assert_eq!(records[2].date, "2024-01-21");
    }

    #[test]
    fn test_missing_revenue_column_yields_nothing() {
        let text = "date,product,region\n2024-01-01,Widget,North\n";
        assert!(parse_sales_csv(text).is_empty());
    }

    #[test]
    fn test_header_only_or_empty_input() {
        assert!(parse_sales_csv("").is_empty());
        assert!(parse_sales_csv("date,product,revenue").is_empty());
        assert!(parse_sales_csv("\n\n").is_empty());
    }

    #[test]
    fn test_unknown_columns_ignored_and_crlf_handled() {
        let text = "\u{FEFF}date,product,notes,revenue\r\n2024-05-05,Widget,whatever,10\r\n";
        let records = parse_sales_csv(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].revenue, 10.0);
    }

    #[test]
    fn test_quotes_are_not_special() {
        let text = "date,product,revenue\n2024-05-05,\"Widget\",10\n";
        let records = parse_sales_csv(text);
        assert_eq!(records[0].product, "\"Widget\"");
    }

    #[test]
    fn test_each_record_gets_a_fresh_id() {
        let text = "date,product,revenue\n2024-05-05,A,1\n2024-05-05,A,1\n";
        let records = parse_sales_csv(text);
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id, records[1].id);
    }
}
