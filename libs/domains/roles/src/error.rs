use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use query_spec::CapabilityError;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RoleError {
    #[error("Role not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Query(#[from] CapabilityError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type RoleResult<T> = Result<T, RoleError>;

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("Permission not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Query(#[from] CapabilityError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type PermissionResult<T> = Result<T, PermissionError>;

impl From<RoleError> for AppError {
    fn from(err: RoleError) -> Self {
        match err {
            RoleError::NotFound(id) => AppError::NotFound(format!("Role {id} not found")),
            RoleError::Query(e) => AppError::Capability(e),
            RoleError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        match err {
            PermissionError::NotFound(id) => {
                AppError::NotFound(format!("Permission {id} not found"))
            }
            PermissionError::Query(e) => AppError::Capability(e),
            PermissionError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for RoleError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl IntoResponse for PermissionError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
