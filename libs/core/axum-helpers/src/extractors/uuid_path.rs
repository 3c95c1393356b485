use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// A single `{id}` path parameter parsed as a UUID.
///
/// ```ignore
/// async fn show(UuidPath(id): UuidPath) -> String {
///     format!("role {id}")
/// }
///
/// let app = Router::new().route("/roles/{id}", get(show));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        Uuid::parse_str(&id)
            .map(UuidPath)
            .map_err(|_| AppError::InvalidUuid(id).into_response())
    }
}
