use super::repository;
use anyhow::Result;
use contracts::domain::a002_data_upload::DataUpload;
use sea_orm::DatabaseConnection;

/// How many entries the upload history shows
pub const HISTORY_LIMIT: u64 = 10;

/// Record a stored upload.
///
/// The records are already saved at this point, so a failure here is only
/// logged and never fails the import.
pub async fn log_upload(db: &DatabaseConnection, file_name: &str, record_count: usize) {
    if let Err(e) = repository::insert(db, file_name, record_count).await {
        tracing::warn!("Failed to log upload of '{}': {}", file_name, e);
    }
}

pub async fn recent_uploads(db: &DatabaseConnection) -> Result<Vec<DataUpload>> {
    repository::list_recent(db, HISTORY_LIMIT).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_connection;

    #[tokio::test]
    async fn test_history_is_newest_first_and_capped() {
        let db = memory_connection().await;
        for i in 0..12 {
            log_upload(&db, &format!("sales-{}.csv", i), i).await;
        }

        let history = recent_uploads(&db).await.unwrap();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].file_name, "sales-11.csv");
        assert_eq!(history[0].record_count, 11);
        assert_eq!(history[9].file_name, "sales-2.csv");
    }
}
