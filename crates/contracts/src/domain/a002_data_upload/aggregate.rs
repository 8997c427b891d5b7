use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upload history entry (a002), one per successfully stored file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataUpload {
    pub id: i64,
    pub file_name: String,
    pub record_count: i64,
    pub uploaded_at: DateTime<Utc>,
}
