use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use query_spec::CapabilityError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Query(#[from] CapabilityError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => AppError::NotFound(format!("User {id} not found")),
            UserError::Query(e) => AppError::Capability(e),
            UserError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
