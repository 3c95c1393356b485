use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use query_spec::{Query, QueryDefaults, RawQuery};

/// The request's query string parsed into a [`Query`].
///
/// Paging defaults come from a [`QueryDefaults`] request extension when the
/// router installs one (`.layer(Extension(defaults))`), otherwise from
/// [`QueryDefaults::default`]. Malformed tokens reject the request with
/// `400 INVALID_QUERY`.
#[derive(Debug, Clone)]
pub struct ListQuery(pub Query);

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let defaults = parts
            .extensions
            .get::<QueryDefaults>()
            .copied()
            .unwrap_or_default();

        let raw = RawQuery::from_query_string(parts.uri.query().unwrap_or_default());
        let query = raw.parse(&defaults)?;

        tracing::debug!(
            page = query.page(),
            per_page = query.per_page(),
            filters = query.filters().len(),
            sorts = query.sorts().len(),
            includes = query.includes().len(),
            "Parsed list query"
        );

        Ok(ListQuery(query))
    }
}
