use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use contracts::domain::a001_sales_record::{
    RecordListQuery, SalesRecordId, SalesRecordListResponse,
};
use contracts::shared::sales_filter::FilterState;
use serde_json::json;

use crate::domain::a001_sales_record::{csv_export, service};
use crate::shared::data::db::get_connection;

/// GET /api/a001/sales-records
pub async fn list(
    Query(filter): Query<FilterState>,
    Query(query): Query<RecordListQuery>,
) -> Result<Json<SalesRecordListResponse>, StatusCode> {
    match service::list_filtered(get_connection(), &filter, &query, Utc::now()).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to list sales records: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/a001/sales-records/export
pub async fn export(Query(filter): Query<FilterState>) -> Result<Response, StatusCode> {
    let now = Utc::now();
    let body = match service::export_filtered(get_connection(), &filter, now).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Failed to export sales records: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let disposition = format!(
        "attachment; filename=\"{}\"",
        csv_export::export_file_name(now.date_naive())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// DELETE /api/a001/sales-records
pub async fn delete_all() -> Result<Json<serde_json::Value>, StatusCode> {
    match service::delete_all(get_connection()).await {
        Ok(deleted) => Ok(Json(json!({ "deleted": deleted }))),
        Err(e) => {
            tracing::error!("Failed to delete sales records: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/a001/sales-records/:id
pub async fn delete_by_id(Path(id): Path<String>) -> Result<Json<serde_json::Value>, StatusCode> {
    let record_id = SalesRecordId::from_string(&id).map_err(|e| {
        tracing::warn!("Rejected delete of sales record '{}': {}", id, e);
        StatusCode::BAD_REQUEST
    })?;
    match service::delete_by_id(get_connection(), record_id.value()).await {
        Ok(true) => Ok(Json(json!({ "deleted": 1 }))),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete sales record {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_rejects_malformed_id() {
        let result = delete_by_id(Path("not-a-record-id".to_string())).await;
        assert_eq!(result.unwrap_err(), StatusCode::BAD_REQUEST);
    }
}
