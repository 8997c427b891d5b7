use once_cell::sync::OnceCell;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use std::path::Path;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

const SCHEMA: &[(&str, &str)] = &[
    (
        "sales_records",
        r#"
        CREATE TABLE IF NOT EXISTS sales_records (
            id TEXT PRIMARY KEY NOT NULL,
            date TEXT NOT NULL,
            product TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            region TEXT NOT NULL DEFAULT '',
            customer_type TEXT,
            quantity REAL NOT NULL DEFAULT 0,
            revenue REAL NOT NULL DEFAULT 0,
            cost REAL NOT NULL DEFAULT 0,
            profit REAL NOT NULL DEFAULT 0,
            created_at TEXT
        );
    "#,
    ),
    (
        "idx_sales_records_date",
        "CREATE INDEX IF NOT EXISTS idx_sales_records_date ON sales_records (date);",
    ),
    (
        "data_uploads",
        r#"
        CREATE TABLE IF NOT EXISTS data_uploads (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_name TEXT NOT NULL,
            record_count INTEGER NOT NULL DEFAULT 0,
            uploaded_at TEXT NOT NULL
        );
    "#,
    ),
];

/// Create tables and indexes that do not exist yet
pub async fn ensure_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for (name, sql) in SCHEMA {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await
        .map_err(|e| anyhow::anyhow!("schema bootstrap failed at {}: {}", name, e))?;
    }
    Ok(())
}

fn sqlite_url(db_file: &Path) -> anyhow::Result<String> {
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    Ok(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
}

/// Open the sqlite file, bootstrap the schema and publish the connection
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = sqlite_url(db_file)?;
    tracing::info!("Opening database: {}", db_url);

    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;

    ensure_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Fresh in-memory database with the schema applied
#[cfg(test)]
pub async fn memory_connection() -> DatabaseConnection {
    // one pooled connection, otherwise every connection sees its own empty database
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let conn = Database::connect(options)
        .await
        .expect("in-memory sqlite should open");
    ensure_schema(&conn).await.expect("schema should apply");
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_url_for_absolute_path() {
        let url = sqlite_url(Path::new("/var/lib/sales/sales.db")).unwrap();
        assert_eq!(url, "sqlite:///var/lib/sales/sales.db?mode=rwc");
    }

    #[tokio::test]
    async fn test_schema_bootstrap_is_idempotent() {
        let conn = memory_connection().await;
        ensure_schema(&conn).await.unwrap();

        let tables = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('sales_records', 'data_uploads');"
                    .to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(tables.len(), 2);
    }
}
