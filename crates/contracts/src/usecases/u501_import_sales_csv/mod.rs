use serde::{Deserialize, Serialize};

/// Columns a user-facing error asks for when nothing could be imported
pub const REQUIRED_COLUMNS: &str = "date, product, category, region, revenue";

/// Result of a successful CSV import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    /// Records parsed from the uploaded file and stored
    pub imported: usize,
    /// Records in the store after the import
    pub total: usize,
}

/// Error body returned by the import endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportErrorResponse {
    pub code: String,
    pub error: String,
}

impl ImportErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
        }
    }
}
