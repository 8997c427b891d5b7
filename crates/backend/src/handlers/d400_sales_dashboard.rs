use axum::{extract::Query, http::StatusCode, Json};
use chrono::Utc;
use contracts::dashboards::d400_sales_dashboard::SalesDashboard;
use contracts::shared::sales_filter::FilterState;
use serde::Deserialize;

use crate::dashboards::d400_sales_dashboard::service;
use crate::shared::config::get_config;
use crate::shared::data::db::get_connection;

#[derive(Deserialize)]
pub struct DashboardParams {
    pub top_limit: Option<usize>,
}

/// GET /api/d400/sales-dashboard
pub async fn get_dashboard(
    Query(filter): Query<FilterState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<SalesDashboard>, StatusCode> {
    let top_limit = params
        .top_limit
        .unwrap_or(get_config().dashboard.top_products_limit);

    match service::get_dashboard(get_connection(), &filter, Utc::now(), top_limit).await {
        Ok(dashboard) => Ok(Json(dashboard)),
        Err(e) => {
            tracing::error!("Failed to build sales dashboard: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
