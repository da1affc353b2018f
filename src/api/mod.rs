//! REST API module.
//!
//! Contains the record routes and the response helpers they share.

mod records;

pub use records::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, ErrorReporting, ReportedError};

/// Success response: the payload itself, serialized as JSON.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub status: StatusCode,
    pub data: T,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.data)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, ReportedError>;

/// Create a 200 response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse {
        status: StatusCode::OK,
        data,
    })
}

/// Create a 201 response.
pub fn created<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse {
        status: StatusCode::CREATED,
        data,
    })
}

/// Create an error response rendered in the configured reporting mode.
pub fn error<T: Serialize>(err: AppError, mode: ErrorReporting) -> ApiResult<T> {
    Err(err.report(mode))
}
