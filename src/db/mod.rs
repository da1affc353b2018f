//! Database module for SQLite persistence.
//!
//! A single table acts as the document collection for animal records.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Connect the pool described by `database_url` and ensure the schema exists.
pub async fn init_database(
    database_url: &str,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    // Ensure the parent directory exists
    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    ensure_schema(&pool).await?;

    Ok(pool)
}

/// Create the record collection if it does not exist yet.
async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // barcode mirrors individual_identification.id; its UNIQUE constraint is
    // the only uniqueness guarantee records get.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS animal_records (
            id TEXT PRIMARY KEY,
            barcode TEXT NOT NULL UNIQUE,
            document TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
