use super::aggregator;
use crate::domain::a001_sales_record;
use crate::shared::format::{format_currency, format_decimal, format_number};
use anyhow::Result;
use chrono::{DateTime, Utc};
use contracts::dashboards::d400_sales_dashboard::SalesDashboard;
use contracts::shared::sales_filter::FilterState;
use sea_orm::DatabaseConnection;

/// Dashboard for the stored records, re-read from the store on every call
pub async fn get_dashboard(
    db: &DatabaseConnection,
    filter: &FilterState,
    now: DateTime<Utc>,
    top_limit: usize,
) -> Result<SalesDashboard> {
    let all = a001_sales_record::service::fetch_all(db).await?;
    let dashboard = aggregator::build_dashboard(&all, filter, now, top_limit);

    tracing::debug!(
        "Dashboard: {} of {} records, {} active filter(s), revenue {}, growth {}%",
        format_number(dashboard.shown_count),
        format_number(dashboard.total_count),
        filter.active_count(),
        format_currency(dashboard.metrics.total_revenue),
        format_decimal(dashboard.metrics.growth_rate)
    );

    Ok(dashboard)
}
