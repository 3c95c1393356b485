use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{HeaderMap, header, request::Parts},
};
use query_spec::Url;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Absolute URL of the current request, used to build pagination links.
///
/// - scheme: `https` when `X-Forwarded-Proto` says so, `http` otherwise
/// - host: the `Host` header, else the request URI's authority, else `localhost`
/// - path and query: the original request URI, before any `nest` stripped a prefix
#[derive(Debug, Clone)]
pub struct RequestUrl(pub Url);

impl<S> FromRequestParts<S> for RequestUrl
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|OriginalUri(uri)| uri)
            .unwrap_or(&parts.uri);

        let scheme = scheme(&parts.headers);
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| uri.authority().map(|authority| authority.as_str()))
            .unwrap_or("localhost");
        let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

        let raw = format!("{scheme}://{host}{path_and_query}");
        Url::parse(&raw)
            .map(RequestUrl)
            .map_err(|e| AppError::BadRequest(format!("Cannot derive request URL from '{raw}': {e}")))
    }
}

fn scheme(headers: &HeaderMap) -> &'static str {
    let forwarded_https = headers
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"));

    if forwarded_https { "https" } else { "http" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, Uri};

    async fn extract(request: Request<()>) -> Url {
        let (mut parts, ()) = request.into_parts();
        RequestUrl::from_request_parts(&mut parts, &()).await.unwrap().0
    }

    #[tokio::test]
    async fn test_host_header_and_forwarded_proto() {
        let request = Request::builder()
            .uri("/api/users?search=a&page=2")
            .header(header::HOST, "api.example.com")
            .header(FORWARDED_PROTO, "https")
            .body(())
            .unwrap();

        let url = extract(request).await;
        assert_eq!(url.as_str(), "https://api.example.com/api/users?search=a&page=2");
    }

    #[tokio::test]
    async fn test_defaults_to_http_and_localhost() {
        let request = Request::builder().uri("/api/roles").body(()).unwrap();
        let url = extract(request).await;
        assert_eq!(url.as_str(), "http://localhost/api/roles");
    }

    #[tokio::test]
    async fn test_prefers_original_uri() {
        let mut request = Request::builder()
            .uri("/roles?page=1")
            .header(header::HOST, "admin.local:8080")
            .body(())
            .unwrap();
        request
            .extensions_mut()
            .insert(OriginalUri(Uri::from_static("/api/roles?page=1")));

        let url = extract(request).await;
        assert_eq!(url.as_str(), "http://admin.local:8080/api/roles?page=1");
    }
}
