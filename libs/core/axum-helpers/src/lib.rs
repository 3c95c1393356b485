//! # Axum Helpers
//!
//! HTTP glue shared by the admin API's domain routers.
//!
//! - **[`errors`]**: `AppError`, the `ErrorResponse` envelope and `ErrorCode`s
//! - **[`extractors`]**: `ListQuery` (query string to `query_spec::Query`),
//!   `RequestUrl` (absolute URL for pagination links) and `UuidPath`
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: router assembly with OpenAPI UIs, health checks, graceful shutdown
//!
//! ```ignore
//! use axum_helpers::{ListQuery, RequestUrl};
//! use query_spec::PagePagination;
//!
//! async fn list(
//!     State(service): State<Arc<RoleService<R>>>,
//!     ListQuery(query): ListQuery,
//!     RequestUrl(url): RequestUrl,
//! ) -> Result<Json<PagePagination<Role>>, AppError> {
//!     let page = service.paginate(&query).await?;
//!     Ok(Json(PagePagination::from_offset(page, &url)))
//! }
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{ListQuery, RequestUrl, UuidPath};
pub use http::{create_cors_layer, security_headers};
pub use server::{
    HealthCheckFuture, HealthResponse, ReadyResponse, ShutdownCoordinator, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};
