use axum::{http::StatusCode, Json};
use contracts::domain::a002_data_upload::DataUpload;

use crate::domain::a002_data_upload::service;
use crate::shared::data::db::get_connection;

/// GET /api/a002/data-uploads
pub async fn list() -> Result<Json<Vec<DataUpload>>, StatusCode> {
    match service::recent_uploads(get_connection()).await {
        Ok(items) => Ok(Json(items)),
        Err(e) => {
            tracing::error!("Failed to list data uploads: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
