//! Database repository for animal record operations.
//!
//! Every operation is a single statement; no transactions are needed.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{AnimalRecord, StoredRecord};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check that the pool can still answer a query.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// List every stored record in storage order.
    pub async fn list_records(&self) -> Result<Vec<StoredRecord>, AppError> {
        let rows = sqlx::query("SELECT id, document FROM animal_records")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(record_from_row).collect()
    }

    /// Insert a new record and return it with its assigned identifier.
    ///
    /// A duplicate identification code is rejected by the storage layer as a conflict.
    pub async fn create_record(&self, record: &AnimalRecord) -> Result<StoredRecord, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let document = serde_json::to_string(record)?;

        sqlx::query(
            "INSERT INTO animal_records (id, barcode, document, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(record.barcode())
        .bind(&document)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Stored record {} with barcode {}", id, record.barcode());

        Ok(StoredRecord {
            id,
            record: record.clone(),
        })
    }

    /// Find the record whose identification code equals `barcode`.
    pub async fn find_by_barcode(&self, barcode: &str) -> Result<Option<StoredRecord>, AppError> {
        let row = sqlx::query("SELECT id, document FROM animal_records WHERE barcode = ?")
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }
}

fn record_from_row(row: &SqliteRow) -> Result<StoredRecord, AppError> {
    let id: String = row.get("id");
    let document: String = row.get("document");
    let record: AnimalRecord = serde_json::from_str(&document)?;
    Ok(StoredRecord { id, record })
}
