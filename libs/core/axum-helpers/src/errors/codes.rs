//! Error codes carried in every [`ErrorResponse`](super::ErrorResponse).
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::InvalidQuery;
//! assert_eq!(code.as_str(), "INVALID_QUERY");
//! assert_eq!(code.code(), 1010);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000s)
    /// Malformed request input outside the query language
    BadRequest,

    /// Invalid UUID in a path parameter
    InvalidUuid,

    /// Requested resource was not found
    NotFound,

    /// No route matches the request path
    RouteNotFound,

    /// Route exists but not for this HTTP method
    MethodNotAllowed,

    /// A `filter`, `sort`, `page` or `per_page` token could not be parsed
    InvalidQuery,

    /// A parsed query names a column, operator or value the resource does not support
    UnsupportedQuery,

    // Server errors (1500s)
    InternalError,

    ServiceUnavailable,

    IoError,

    // Database errors (2000s)
    DatabaseError,

    DatabaseUnavailable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::InvalidUuid => "INVALID_UUID",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::RouteNotFound => "ROUTE_NOT_FOUND",
            ErrorCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ErrorCode::InvalidQuery => "INVALID_QUERY",
            ErrorCode::UnsupportedQuery => "UNSUPPORTED_QUERY",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::IoError => "IO_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
        }
    }

    /// Integer code for logs and dashboards.
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::BadRequest => 1001,
            ErrorCode::InvalidUuid => 1002,
            ErrorCode::NotFound => 1004,
            ErrorCode::RouteNotFound => 1005,
            ErrorCode::MethodNotAllowed => 1006,
            ErrorCode::InvalidQuery => 1010,
            ErrorCode::UnsupportedQuery => 1011,
            ErrorCode::InternalError => 1500,
            ErrorCode::ServiceUnavailable => 1503,
            ErrorCode::IoError => 1510,
            ErrorCode::DatabaseError => 2001,
            ErrorCode::DatabaseUnavailable => 2002,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "The request could not be understood",
            ErrorCode::InvalidUuid => "Invalid UUID format",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::RouteNotFound => "The requested resource was not found",
            ErrorCode::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            ErrorCode::InvalidQuery => "Invalid query parameters",
            ErrorCode::UnsupportedQuery => "Unsupported query parameters",
            ErrorCode::InternalError => "An internal server error occurred",
            ErrorCode::ServiceUnavailable => "Service is temporarily unavailable",
            ErrorCode::IoError => "An I/O error occurred",
            ErrorCode::DatabaseError => "A database error occurred",
            ErrorCode::DatabaseUnavailable => "The database is temporarily unavailable",
        }
    }

    pub fn is_client_error(&self) -> bool {
        (1000..1500).contains(&self.code())
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
