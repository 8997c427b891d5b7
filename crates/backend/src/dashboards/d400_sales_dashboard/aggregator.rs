//! Pure reductions of a record set into dashboard numbers.
//!
//! Nothing here touches the database or mutates records. Groupings keep the
//! order in which labels first appear, so equal totals rank by that order.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use contracts::dashboards::d400_sales_dashboard::{
    ChartData, FilterOptions, SalesDashboard, SalesMetrics, TimeSeriesData, NOT_AVAILABLE,
};
use contracts::domain::a001_sales_record::SalesRecord;
use contracts::shared::date_utils::{format_day, sales_day};
use contracts::shared::sales_filter::FilterState;
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeMap;

pub const DEFAULT_TOP_PRODUCTS: usize = 5;

/// Revenue summed per label, labels in first-appearance order
fn revenue_by<'a, F>(records: &'a [SalesRecord], label: F) -> IndexMap<&'a str, f64>
where
    F: Fn(&'a SalesRecord) -> &'a str,
{
    let mut totals: IndexMap<&str, f64> = IndexMap::new();
    for record in records {
        *totals.entry(label(record)).or_insert(0.0) += record.revenue;
    }
    totals
}

/// Label with the largest total; the earliest label wins a tie
fn top_label(totals: &IndexMap<&str, f64>) -> String {
    let mut best: Option<(&str, f64)> = None;
    for (label, value) in totals {
        if best.map_or(true, |(_, v)| *value > v) {
            best = Some((*label, *value));
        }
    }
    match best {
        Some((label, _)) if !label.is_empty() => label.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn to_chart(totals: IndexMap<&str, f64>) -> Vec<ChartData> {
    totals
        .into_iter()
        .map(|(label, value)| ChartData {
            label: label.to_string(),
            value,
        })
        .collect()
}

fn sorted_desc(totals: IndexMap<&str, f64>) -> Vec<ChartData> {
    let mut chart = to_chart(totals);
    // stable: equal values keep first-appearance order
    chart.sort_by(|a, b| b.value.total_cmp(&a.value));
    chart
}

/// Relative revenue change between the later and the earlier half of the
/// records by date. Halves are split by record count (`n / 2`, the earlier
/// half is the smaller one), not by calendar time; this is a coarse trend.
fn growth_rate(records: &[SalesRecord]) -> f64 {
    let mut by_date: Vec<(Option<NaiveDateTime>, f64)> = records
        .iter()
        .map(|r| (r.parsed_date(), r.revenue))
        .collect();
    // undated records sort first
    by_date.sort_by_key(|(date, _)| *date);

    let mid = by_date.len() / 2;
    let first_half: f64 = by_date[..mid].iter().map(|(_, v)| v).sum();
    let second_half: f64 = by_date[mid..].iter().map(|(_, v)| v).sum();

    if first_half > 0.0 {
        (second_half - first_half) / first_half * 100.0
    } else {
        0.0
    }
}

pub fn calculate_metrics(records: &[SalesRecord]) -> SalesMetrics {
    if records.is_empty() {
        return SalesMetrics::empty();
    }

    let total_revenue: f64 = records.iter().map(|r| r.revenue).sum();
    let total_profit: f64 = records.iter().map(|r| r.profit).sum();
    let total_orders = records.len();
    let profit_margin = if total_revenue > 0.0 {
        total_profit / total_revenue * 100.0
    } else {
        0.0
    };

    SalesMetrics {
        total_revenue,
        total_profit,
        total_orders,
        avg_order_value: total_revenue / total_orders as f64,
        profit_margin,
        top_product: top_label(&revenue_by(records, |r| r.product.as_str())),
        top_region: top_label(&revenue_by(records, |r| r.region.as_str())),
        growth_rate: growth_rate(records),
    }
}

/// Best selling products by revenue, at most `limit` entries
pub fn top_products(records: &[SalesRecord], limit: usize) -> Vec<ChartData> {
    let mut chart = sorted_desc(revenue_by(records, |r| r.product.as_str()));
    chart.truncate(limit);
    chart
}

/// Revenue per category, unsorted
pub fn category_distribution(records: &[SalesRecord]) -> Vec<ChartData> {
    to_chart(revenue_by(records, |r| r.category.as_str()))
}

/// Revenue per region, largest first
pub fn regional_sales(records: &[SalesRecord]) -> Vec<ChartData> {
    sorted_desc(revenue_by(records, |r| r.region.as_str()))
}

/// Revenue per calendar day, oldest first. Undated records are left out.
pub fn time_series(records: &[SalesRecord]) -> Vec<TimeSeriesData> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        match sales_day(&record.date) {
            Some(day) => *by_day.entry(day).or_insert(0.0) += record.revenue,
            None => tracing::debug!(
                "time series: skipping record {} with date '{}'",
                record.id,
                record.date
            ),
        }
    }

    by_day
        .into_iter()
        .map(|(day, value)| TimeSeriesData {
            date: format_day(day),
            value,
        })
        .collect()
}

/// Distinct non-empty labels for the filter selectors
pub fn filter_options(records: &[SalesRecord]) -> FilterOptions {
    fn distinct<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
        labels
            .filter(|l| !l.is_empty())
            .collect::<IndexSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    FilterOptions {
        categories: distinct(records.iter().map(|r| r.category.as_str())),
        regions: distinct(records.iter().map(|r| r.region.as_str())),
        products: distinct(records.iter().map(|r| r.product.as_str())),
    }
}

/// Dashboard for one filter selection over the full record set
pub fn build_dashboard(
    all: &[SalesRecord],
    filter: &FilterState,
    now: DateTime<Utc>,
    top_limit: usize,
) -> SalesDashboard {
    let filtered = filter.apply(all, now);

    SalesDashboard {
        filter: filter.clone(),
        metrics: calculate_metrics(&filtered),
        top_products: top_products(&filtered, top_limit),
        category_distribution: category_distribution(&filtered),
        regional_sales: regional_sales(&filtered),
        time_series: time_series(&filtered),
        filter_options: filter_options(all),
        shown_count: filtered.len(),
        total_count: all.len(),
    }
}
