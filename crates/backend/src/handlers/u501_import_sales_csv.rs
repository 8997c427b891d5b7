use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
    Json,
};
use contracts::usecases::u501_import_sales_csv::{ImportErrorResponse, ImportResponse};

use crate::shared::config::get_config;
use crate::shared::data::db::get_connection;
use crate::usecases::u501_import_sales_csv::{self, ImportError, UploadedFile};

type ImportFailure = (StatusCode, Json<ImportErrorResponse>);

fn failure(status: StatusCode, code: &str, message: impl Into<String>) -> ImportFailure {
    (status, Json(ImportErrorResponse::new(code, message)))
}

fn map_import_error(e: ImportError) -> ImportFailure {
    match &e {
        ImportError::Storage(inner) => {
            tracing::error!("Sales CSV import failed: {:#}", inner);
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.code(),
                "Failed to save sales data",
            )
        }
        ImportError::Busy => failure(StatusCode::CONFLICT, e.code(), e.to_string()),
        _ => failure(StatusCode::BAD_REQUEST, e.code(), e.to_string()),
    }
}

fn multipart_failure(e: MultipartError, max_size: usize) -> ImportFailure {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return map_import_error(ImportError::too_large(max_size));
    }
    tracing::warn!("Malformed multipart upload: {}", e);
    map_import_error(ImportError::Unreadable)
}

/// Pull the `file` field out of the multipart body
async fn read_file_field(
    multipart: &mut Multipart,
    max_size: usize,
) -> Result<UploadedFile, ImportFailure> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return Err(failure(
                    StatusCode::BAD_REQUEST,
                    "missing_file",
                    "Multipart field 'file' is required",
                ))
            }
            Err(e) => return Err(multipart_failure(e, max_size)),
        };

        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_failure(e, max_size))?;

        return Ok(UploadedFile {
            file_name,
            bytes: bytes.to_vec(),
        });
    }
}

/// POST /api/u501/import-sales-csv
pub async fn import_sales_csv(
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ImportFailure> {
    let max_size = get_config().upload.max_file_size_bytes;
    let file = read_file_field(&mut multipart, max_size).await?;

    let outcome = u501_import_sales_csv::execute_exclusive(get_connection(), &file, max_size)
        .await
        .map_err(map_import_error)?;

    Ok(Json(ImportResponse {
        imported: outcome.imported,
        total: outcome.records.len(),
    }))
}
