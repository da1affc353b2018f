//! Error handling module for the zoo records backend.
//!
//! Provides centralized error kinds with mapping to HTTP status codes and JSON error bodies.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const CONFLICT: &str = "CONFLICT";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
}

/// Message returned for every failure in generic reporting mode.
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Message returned when a barcode lookup matches nothing.
pub const BARCODE_NOT_FOUND: &str = "Barcode not found";

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Request body does not describe a complete record
    Validation(String),
    /// Resource not found
    NotFound(String),
    /// Uniqueness violation
    Conflict(String),
    /// Storage unavailable or failing
    Database(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Conflict(_) => codes::CONFLICT,
            AppError::Database(_) => codes::DATABASE_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Database(msg)
            | AppError::Internal(msg) => msg,
        }
    }

    /// Attach a reporting mode, producing something a handler can return.
    pub fn report(self, mode: ErrorReporting) -> ReportedError {
        ReportedError { error: self, mode }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                tracing::warn!("Unique constraint violation: {}", db_err);
                return AppError::Conflict(
                    "A record with this identification code already exists".to_string(),
                );
            }
        }
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Document encoding error: {:?}", err);
        AppError::Internal(format!("Document encoding error: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        AppError::Validation(rejection.body_text())
    }
}

/// How failures are presented to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReporting {
    /// Not-found is a 404, everything else an undifferentiated 500.
    Generic,
    /// Every error kind carries its own status code and message.
    Distinct,
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// An error paired with the reporting mode it is rendered in.
#[derive(Debug)]
pub struct ReportedError {
    pub error: AppError,
    pub mode: ErrorReporting,
}

impl ReportedError {
    fn status_and_body(&self) -> (StatusCode, ErrorResponse) {
        match (self.mode, &self.error) {
            (ErrorReporting::Generic, AppError::NotFound(msg)) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: msg.clone(),
                    code: None,
                },
            ),
            (ErrorReporting::Generic, _) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: INTERNAL_SERVER_ERROR.to_string(),
                    code: None,
                },
            ),
            (ErrorReporting::Distinct, err) => (
                err.status_code(),
                ErrorResponse {
                    error: err.message().to_string(),
                    code: Some(err.error_code().to_string()),
                },
            ),
        }
    }
}

impl IntoResponse for ReportedError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_mode_hides_everything_but_not_found() {
        let cases = [
            AppError::Validation("species_name is required".to_string()),
            AppError::Conflict("duplicate".to_string()),
            AppError::Database("pool timed out".to_string()),
            AppError::Internal("bad document".to_string()),
        ];

        for err in cases {
            let (status, body) = err.report(ErrorReporting::Generic).status_and_body();
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body.error, INTERNAL_SERVER_ERROR);
            assert!(body.code.is_none());
        }

        let (status, body) = AppError::NotFound(BARCODE_NOT_FOUND.to_string())
            .report(ErrorReporting::Generic)
            .status_and_body();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "error": "Barcode not found" })
        );
    }

    #[test]
    fn test_distinct_mode_maps_each_kind() {
        let cases = [
            (AppError::Validation("x".into()), 400, codes::VALIDATION_ERROR),
            (AppError::NotFound("x".into()), 404, codes::NOT_FOUND),
            (AppError::Conflict("x".into()), 409, codes::CONFLICT),
            (AppError::Database("x".into()), 503, codes::DATABASE_ERROR),
            (AppError::Internal("x".into()), 500, codes::INTERNAL_ERROR),
        ];

        for (err, status, code) in cases {
            let (actual, body) = err.report(ErrorReporting::Distinct).status_and_body();
            assert_eq!(actual.as_u16(), status);
            assert_eq!(body.code.as_deref(), Some(code));
            assert_eq!(body.error, "x");
        }
    }
}
