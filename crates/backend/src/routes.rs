use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::handlers;
use crate::shared::config::get_config;

/// Room for multipart framing around the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// All application routes
pub fn configure_routes() -> Router {
    let upload_limit = get_config().upload.max_file_size_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // U501 Import sales CSV
        // ========================================
        .route(
            "/api/u501/import-sales-csv",
            post(handlers::u501_import_sales_csv::import_sales_csv)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        // ========================================
        // A001 Sales records
        // ========================================
        .route(
            "/api/a001/sales-records",
            get(handlers::a001_sales_record::list).delete(handlers::a001_sales_record::delete_all),
        )
        .route(
            "/api/a001/sales-records/export",
            get(handlers::a001_sales_record::export),
        )
        .route(
            "/api/a001/sales-records/:id",
            delete(handlers::a001_sales_record::delete_by_id),
        )
        // A002 Upload history
        .route(
            "/api/a002/data-uploads",
            get(handlers::a002_data_upload::list),
        )
        // D400 Sales dashboard
        .route(
            "/api/d400/sales-dashboard",
            get(handlers::d400_sales_dashboard::get_dashboard),
        )
}
