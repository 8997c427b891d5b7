use serde::{Deserialize, Serialize};

use crate::shared::sales_filter::FilterState;

/// Label used when there is nothing to rank
pub const NOT_AVAILABLE: &str = "N/A";

/// Summary statistics over the current record set (recomputed on every call)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesMetrics {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub total_orders: usize,
    pub avg_order_value: f64,
    /// Percent of revenue kept as profit
    pub profit_margin: f64,
    pub top_product: String,
    pub top_region: String,
    /// Percent change of revenue between the later and the earlier half of records
    pub growth_rate: f64,
}

impl SalesMetrics {
    /// Result for an empty record set
    pub fn empty() -> Self {
        Self {
            total_revenue: 0.0,
            total_profit: 0.0,
            total_orders: 0,
            avg_order_value: 0.0,
            profit_margin: 0.0,
            top_product: NOT_AVAILABLE.to_string(),
            top_region: NOT_AVAILABLE.to_string(),
            growth_rate: 0.0,
        }
    }
}

/// One bucket of a grouping (product, category, region)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub label: String,
    pub value: f64,
}

/// Revenue of one calendar day ("YYYY-MM-DD")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesData {
    pub date: String,
    pub value: f64,
}

/// Distinct labels available for the filter selectors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub regions: Vec<String>,
    pub products: Vec<String>,
}

/// Everything the dashboard page shows for one filter selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesDashboard {
    pub filter: FilterState,
    pub metrics: SalesMetrics,
    pub top_products: Vec<ChartData>,
    pub category_distribution: Vec<ChartData>,
    pub regional_sales: Vec<ChartData>,
    pub time_series: Vec<TimeSeriesData>,
    /// Built from the whole record set, not the filtered one
    pub filter_options: FilterOptions,
    pub shown_count: usize,
    pub total_count: usize,
}
