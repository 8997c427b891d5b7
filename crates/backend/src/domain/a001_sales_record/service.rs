use super::{csv_export, repository};
use crate::domain::a002_data_upload;
use crate::shared::format::{format_currency, format_number};
use anyhow::Result;
use chrono::{DateTime, Utc};
use contracts::domain::a001_sales_record::{
    RecordListQuery, SalesRecord, SalesRecordListResponse, SortDirection, SortField,
};
use contracts::shared::sales_filter::FilterState;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Store parsed records and note the upload in the history
pub async fn save_records(
    db: &DatabaseConnection,
    records: &[SalesRecord],
    file_name: &str,
) -> Result<usize> {
    let saved = repository::insert_batch(db, records).await?;
    a002_data_upload::service::log_upload(db, file_name, saved).await;
    let revenue: f64 = records.iter().map(|r| r.revenue).sum();
    tracing::info!(
        "Saved {} sales records from '{}' ({} revenue)",
        format_number(saved),
        file_name,
        format_currency(revenue)
    );
    Ok(saved)
}

/// Full record set ordered by date
pub async fn fetch_all(db: &DatabaseConnection) -> Result<Vec<SalesRecord>> {
    repository::list_all(db).await
}

/// Stable sort of `records` by one column
pub fn sort_records(records: &mut [SalesRecord], field: SortField, dir: SortDirection) {
    records.sort_by(|a, b| {
        let ord = match field {
            SortField::Date => a.parsed_date().cmp(&b.parsed_date()),
            SortField::Product => a.product.cmp(&b.product),
            SortField::Category => a.category.cmp(&b.category),
            SortField::Region => a.region.cmp(&b.region),
            SortField::Quantity => a.quantity.total_cmp(&b.quantity),
            SortField::Revenue => a.revenue.total_cmp(&b.revenue),
            SortField::Profit => a.profit.total_cmp(&b.profit),
        };
        match dir {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// Filtered records, optionally re-sorted and cut to `query.limit`.
/// `shown` counts every match, not just the returned page.
pub async fn list_filtered(
    db: &DatabaseConnection,
    filter: &FilterState,
    query: &RecordListQuery,
    now: DateTime<Utc>,
) -> Result<SalesRecordListResponse> {
    let all = repository::list_all(db).await?;
    let mut items = filter.apply(&all, now);
    let shown = items.len();

    if let Some(field) = query.sort {
        sort_records(&mut items, field, query.dir);
    }
    if let Some(limit) = query.limit {
        items.truncate(limit);
    }

    Ok(SalesRecordListResponse {
        shown,
        total: all.len(),
        items,
    })
}

/// CSV text of the records that pass the filter
pub async fn export_filtered(
    db: &DatabaseConnection,
    filter: &FilterState,
    now: DateTime<Utc>,
) -> Result<String> {
    let all = repository::list_all(db).await?;
    csv_export::export_csv(&filter.apply(&all, now))
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Uuid) -> Result<bool> {
    let deleted = repository::delete_by_id(db, id).await?;
    if deleted {
        tracing::info!("Deleted sales record {}", id);
    }
    Ok(deleted)
}

pub async fn delete_all(db: &DatabaseConnection) -> Result<u64> {
    let deleted = repository::delete_all(db).await?;
    tracing::info!("Deleted all sales records ({} rows)", deleted);
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_sales_record::csv_import::parse_sales_csv;
    use crate::shared::data::db::memory_connection;
    use chrono::TimeZone;
    use contracts::shared::sales_filter::DateRange;

    const SAMPLE: &str = "date,product,category,region,quantity,revenue,cost\n\
        2024-01-01,Widget A,Electronics,North,5,500,300\n\
        2024-05-20,Widget B,Tools,South,2,200,150\n\
        2024-06-01,Widget A,Electronics,South,1,100,60\n";

    #[tokio::test]
    async fn test_save_then_filtered_list() {
        let db = memory_connection().await;
        let records = parse_sales_csv(SAMPLE);
        assert_eq!(save_records(&db, &records, "sample.csv").await.unwrap(), 3);

        let now = Utc.with_ymd_and_hms(2024, 6, 2, 0, 0, 0).unwrap();
        let filter = FilterState {
            region: "South".to_string(),
            date_range: DateRange::LastDays(30),
            ..FilterState::default()
        };
        let response = list_filtered(&db, &filter, &RecordListQuery::default(), now)
            .await
            .unwrap();
        assert_eq!(response.total, 3);
        assert_eq!(response.shown, 2);
        assert_eq!(response.items[0].product, "Widget B");

        let history = a002_data_upload::service::recent_uploads(&db).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].file_name, "sample.csv");
        assert_eq!(history[0].record_count, 3);
    }

    #[tokio::test]
    async fn test_list_sorted_newest_first_and_limited() {
        let db = memory_connection().await;
        save_records(&db, &parse_sales_csv(SAMPLE), "sample.csv")
            .await
            .unwrap();

        let query = RecordListQuery {
            sort: Some(SortField::Date),
            dir: SortDirection::Desc,
            limit: Some(2),
        };
        let response = list_filtered(&db, &FilterState::default(), &query, Utc::now())
            .await
            .unwrap();
        assert_eq!(response.shown, 3);
        assert_eq!(response.total, 3);
        let dates: Vec<&str> = response.items.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-06-01", "2024-05-20"]);
    }

    #[test]
    fn test_sort_records_by_revenue_is_stable() {
        let mut records = parse_sales_csv(
            "date,product,revenue
2024-01-01,A,10
2024-01-02,B,30
2024-01-03,C,10
",
        );
        sort_records(&mut records, SortField::Revenue, SortDirection::Asc);
        let products: Vec<&str> = records.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(products, vec!["A", "C", "B"]);

        sort_records(&mut records, SortField::Product, SortDirection::Desc);
        assert_eq!(records[0].product, "C");
    }

    #[tokio::test]
    async fn test_export_uses_filter() {
        let db = memory_connection().await;
        save_records(&db, &parse_sales_csv(SAMPLE), "sample.csv")
            .await
            .unwrap();

        let filter = FilterState {
            product: "Widget A".to_string(),
            ..FilterState::default()
        };
        let csv = export_filtered(&db, &filter, Utc::now()).await.unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2024-01-01,Widget A,Electronics,North,5,500,200");
        assert_eq!(lines[2], "2024-06-01,Widget A,Electronics,South,1,100,40");
    }
}
