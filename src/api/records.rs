//! Animal record API endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::{created, error, success, ApiResult};
use crate::errors::{AppError, BARCODE_NOT_FOUND};
use crate::models::{AnimalRecord, BarcodeQuery, StoredRecord};
use crate::AppState;

/// GET /data - List all records.
pub async fn list_records(State(state): State<AppState>) -> ApiResult<Vec<StoredRecord>> {
    let mode = state.config.error_reporting;

    match state.repo.list_records().await {
        Ok(records) => success(records),
        Err(e) => error(e, mode),
    }
}

/// POST /data - Create a new record.
pub async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<AnimalRecord>, JsonRejection>,
) -> ApiResult<StoredRecord> {
    let mode = state.config.error_reporting;

    let record = match payload {
        Ok(Json(record)) => record,
        Err(rejection) => return error(rejection.into(), mode),
    };

    if let Err(e) = record.validate() {
        tracing::warn!("Rejected record: {}", e);
        return error(e, mode);
    }

    match state.repo.create_record(&record).await {
        Ok(stored) => {
            tracing::info!("Created record {} ({})", stored.id, record.barcode());
            created(stored)
        }
        Err(e) => error(e, mode),
    }
}

/// POST /barcode - Look a record up by its identification code.
pub async fn find_by_barcode(
    State(state): State<AppState>,
    payload: Result<Json<BarcodeQuery>, JsonRejection>,
) -> ApiResult<StoredRecord> {
    let mode = state.config.error_reporting;

    let query = match payload {
        Ok(Json(query)) => query,
        Err(rejection) => return error(rejection.into(), mode),
    };

    match state.repo.find_by_barcode(&query.barcode).await {
        Ok(Some(record)) => success(record),
        Ok(None) => {
            tracing::debug!("No record for barcode {:?}", query.barcode);
            error(AppError::NotFound(BARCODE_NOT_FOUND.to_string()), mode)
        }
        Err(e) => error(e, mode),
    }
}
