use axum::{http::StatusCode, response::Response};

use super::{ErrorCode, error_response};

/// Router fallback for unmatched paths.
pub async fn not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::RouteNotFound.default_message(),
        ErrorCode::RouteNotFound,
    )
}

pub async fn method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::MethodNotAllowed.default_message(),
        ErrorCode::MethodNotAllowed,
    )
}
