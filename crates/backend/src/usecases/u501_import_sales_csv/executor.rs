use crate::domain::a001_sales_record::{csv_import, service};
use crate::shared::format::{format_decimal, format_number};
use contracts::domain::a001_sales_record::SalesRecord;
use contracts::usecases::u501_import_sales_csv::REQUIRED_COLUMNS;
use once_cell::sync::Lazy;
use sea_orm::DatabaseConnection;
use thiserror::Error;
use tokio::sync::Mutex;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Held for the whole duration of an import
static IMPORT_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Please upload a CSV file")]
    NotCsv,

    #[error("File size should be less than {limit_mb}MB")]
    FileTooLarge { limit_mb: String },

    #[error("Failed to read file")]
    Unreadable,

    #[error("No valid records found in CSV. Please ensure your file has the required columns: {}", REQUIRED_COLUMNS)]
    NoValidRecords,

    #[error("Another upload is already in progress")]
    Busy,

    #[error("Failed to store sales data: {0}")]
    Storage(#[source] anyhow::Error),
}

impl ImportError {
    pub fn too_large(max_size: usize) -> Self {
        ImportError::FileTooLarge {
            limit_mb: format_decimal(max_size as f64 / (1024.0 * 1024.0)),
        }
    }

    /// Stable identifier sent to clients next to the message
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::NotCsv => "not_csv",
            ImportError::FileTooLarge { .. } => "file_too_large",
            ImportError::Unreadable => "unreadable",
            ImportError::NoValidRecords => "no_valid_records",
            ImportError::Busy => "busy",
            ImportError::Storage(_) => "storage",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Records parsed from this file
    pub imported: usize,
    /// The whole store after the import, ordered by date
    pub records: Vec<SalesRecord>,
}

/// Format checks that run before any parsing. Returns the file text.
pub fn validate_upload(file: &UploadedFile, max_size: usize) -> Result<&str, ImportError> {
    if !file.file_name.to_ascii_lowercase().ends_with(".csv") {
        return Err(ImportError::NotCsv);
    }

    if file.bytes.len() > max_size {
        return Err(ImportError::too_large(max_size));
    }

    let bytes = file.bytes.strip_prefix(UTF8_BOM).unwrap_or(file.bytes.as_slice());
    std::str::from_utf8(bytes).map_err(|_| ImportError::Unreadable)
}

/// Validate, parse and store one uploaded file, then return the refreshed store
pub async fn execute(
    db: &DatabaseConnection,
    file: &UploadedFile,
    max_size: usize,
) -> Result<ImportOutcome, ImportError> {
    let text = validate_upload(file, max_size)?;

    let parsed = csv_import::parse_sales_csv(text);
    if parsed.is_empty() {
        tracing::warn!("No valid records in '{}'", file.file_name);
        return Err(ImportError::NoValidRecords);
    }

    tracing::info!(
        "Parsed {} records from '{}' ({} bytes)",
        format_number(parsed.len()),
        file.file_name,
        format_number(file.bytes.len())
    );

    let imported = service::save_records(db, &parsed, &file.file_name)
        .await
        .map_err(ImportError::Storage)?;

    let records = service::fetch_all(db)
        .await
        .map_err(ImportError::Storage)?;

    Ok(ImportOutcome { imported, records })
}

/// Same as [`execute`], refused with `Busy` while another import runs
pub async fn execute_exclusive(
    db: &DatabaseConnection,
    file: &UploadedFile,
    max_size: usize,
) -> Result<ImportOutcome, ImportError> {
    let _guard = IMPORT_LOCK.try_lock().map_err(|_| ImportError::Busy)?;
    execute(db, file, max_size).await
}
