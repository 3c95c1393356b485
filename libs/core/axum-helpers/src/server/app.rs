use super::shutdown::{ShutdownCoordinator, coordinated_shutdown};
use crate::errors::handlers::not_found;
use crate::http::{cors_layer_from_env, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Wraps `apis` with documentation and the cross-cutting layers.
///
/// - `apis` nested under `/api`
/// - Swagger UI (`/swagger-ui`, spec at `/api-docs/openapi.json`), ReDoc (`/redoc`),
///   RapiDoc (`/rapidoc`) and Scalar (`/scalar`) for `T`
/// - JSON 404 fallback, request tracing, security headers, CORS and compression
///
/// Fails when `CORS_ALLOWED_ORIGIN` is missing or invalid.
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let cors_layer = cors_layer_from_env()?;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serves `router` until SIGINT/SIGTERM, then runs `cleanup` for at most
/// `server_config.shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let shutdown_timeout = server_config.shutdown_timeout;
    let (coordinator, _rx) = ShutdownCoordinator::new();
    let signal_handle = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!(address = %listener.local_addr()?, "Server starting");

    let cleanup_handle = tokio::spawn(async move {
        signal_handle.wait_for_signal().await;
        run_cleanup(cleanup, shutdown_timeout).await;
    });

    let served = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(coordinated_shutdown(coordinator))
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Server encountered an error"));

    if let Err(e) = cleanup_handle.await {
        warn!(error = %e, "Cleanup task did not complete");
    }

    served
}

async fn run_cleanup<F: Future<Output = ()>>(cleanup: F, timeout: Duration) {
    info!(?timeout, "Running cleanup");
    match tokio::time::timeout(timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed"),
        Err(_) => warn!(?timeout, "Cleanup exceeded timeout, forcing shutdown"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct EmptyDoc;

    fn router() -> Router {
        temp_env::with_var(
            "CORS_ALLOWED_ORIGIN",
            Some("http://localhost:3000"),
            || {
                create_router::<EmptyDoc>(Router::new().route("/ping", get(|| async { "pong" })))
                    .unwrap()
            },
        )
    }

    #[tokio::test]
    async fn test_routes_are_nested_under_api() {
        let response = router()
            .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-frame-options"], "DENY");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = router()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "ROUTE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_cleanup_timeout_does_not_hang() {
        tokio::time::timeout(
            Duration::from_secs(1),
            run_cleanup(std::future::pending::<()>(), Duration::from_millis(10)),
        )
        .await
        .unwrap();
    }
}
