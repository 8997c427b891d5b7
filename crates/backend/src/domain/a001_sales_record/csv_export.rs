use anyhow::Result;
use chrono::NaiveDate;
use contracts::domain::a001_sales_record::SalesRecord;

/// Export header. Cost and customer type are not exported.
pub const EXPORT_HEADERS: [&str; 7] = [
    "Date", "Product", "Category", "Region", "Quantity", "Revenue", "Profit",
];

fn to_csv_row(record: &SalesRecord) -> [String; 7] {
    [
        record.date.clone(),
        record.product.clone(),
        record.category.clone(),
        record.region.clone(),
        record.quantity.to_string(),
        record.revenue.to_string(),
        record.profit.to_string(),
    ]
}

/// Render records as CSV text, one line per record.
///
/// Values are written as-is, the same unquoted dialect the importer reads.
/// A label containing a comma will not import back cleanly.
pub fn export_csv(records: &[SalesRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;
    for record in records {
        writer.write_record(to_csv_row(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV export: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

/// Download name for an export made on `today`
pub fn export_file_name(today: NaiveDate) -> String {
    format!("sales-data-{}.csv", today.format("%Y-%m-%d"))
}
