pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use query_spec::{CapabilityError, QueryError};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;

/// Body of every error response.
///
/// ```json
/// {
///   "code": 1010,
///   "error": "INVALID_QUERY",
///   "message": "Invalid query parameters",
///   "details": { "filter": ["malformed filter 'nameadmin': expected ..."] }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    pub message: String,
    /// Field-keyed messages, e.g. `{"filter": ["..."]}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.code(),
            error: code.as_str().to_string(),
            message: message.into(),
            details: None,
        }
    }

    /// Adds `message` under `field` in the details map.
    pub fn with_field_error(mut self, field: &str, message: impl Into<String>) -> Self {
        let details = self.details.get_or_insert_with(|| json!({}));
        if let Some(map) = details.as_object_mut() {
            let entry = map.entry(field.to_string()).or_insert_with(|| json!([]));
            if let Some(list) = entry.as_array_mut() {
                list.push(json!(message.into()));
            }
        }
        self
    }
}

/// Errors handlers may return; each maps to a status code and an [`ErrorCode`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Invalid UUID: {0}")]
    InvalidUuid(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Query(_)
            | AppError::Capability(_)
            | AppError::BadRequest(_)
            | AppError::InvalidUuid(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(DbErr::ConnectionAcquire(_)) | AppError::ServiceUnavailable(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Database(_) | AppError::Io(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::Query(_) => ErrorCode::InvalidQuery,
            AppError::Capability(_) => ErrorCode::UnsupportedQuery,
            AppError::Database(DbErr::ConnectionAcquire(_)) => ErrorCode::DatabaseUnavailable,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Io(_) => ErrorCode::IoError,
            AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::InvalidUuid(_) => ErrorCode::InvalidUuid,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }

    /// The response body. Storage and I/O failures are reported with the
    /// default message only; their detail stays in the logs.
    pub fn to_error_response(&self) -> ErrorResponse {
        let code = self.error_code();
        match self {
            AppError::Query(e) => ErrorResponse::new(code, code.default_message())
                .with_field_error(e.parameter(), e.to_string()),
            AppError::Capability(e) => ErrorResponse::new(code, code.default_message())
                .with_field_error(e.parameter(), e.to_string()),
            AppError::Database(_) | AppError::Io(_) => {
                ErrorResponse::new(code, code.default_message())
            }
            AppError::InvalidUuid(raw) => ErrorResponse::new(code, code.default_message())
                .with_field_error("id", format!("'{raw}' is not a valid UUID")),
            AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::InternalServerError(msg)
            | AppError::ServiceUnavailable(msg) => ErrorResponse::new(code, msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(error_code = code.code(), error = ?self, "Request failed");
        } else {
            tracing::info!(error_code = code.code(), error = %self, "Request rejected");
        }

        (status, Json(self.to_error_response())).into_response()
    }
}

/// A bare error response with the code's status-independent body.
pub fn error_response(status: StatusCode, message: impl Into<String>, error_code: ErrorCode) -> Response {
    (status, Json(ErrorResponse::new(error_code, message))).into_response()
}
