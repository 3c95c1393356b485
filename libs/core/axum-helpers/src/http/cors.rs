use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const CORS_ALLOWED_ORIGIN: &str = "CORS_ALLOWED_ORIGIN";

/// Parses a comma-separated origin list. Blank entries are skipped; an empty
/// list is an error.
pub fn parse_allowed_origins(raw: &str) -> io::Result<Vec<HeaderValue>> {
    let origins = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Invalid {CORS_ALLOWED_ORIGIN} value: {e}"),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{CORS_ALLOWED_ORIGIN} cannot be empty"),
        ));
    }

    Ok(origins)
}

/// Read-only CORS for the admin API: `GET`/`HEAD`/`OPTIONS` from the listed
/// origins, with credentials, cached for an hour.
pub fn create_cors_layer(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// [`create_cors_layer`] for the origins in `CORS_ALLOWED_ORIGIN`, which must be set.
pub fn cors_layer_from_env() -> io::Result<CorsLayer> {
    let raw = std::env::var(CORS_ALLOWED_ORIGIN).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{CORS_ALLOWED_ORIGIN} environment variable is required. Example: {CORS_ALLOWED_ORIGIN}=http://localhost:3000"
            ),
        )
    })?;

    let origins = parse_allowed_origins(&raw)?;
    tracing::info!(origins = %raw, "CORS configured");
    Ok(create_cors_layer(origins))
}
