//! Router assembly, health endpoints and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes)?
//!     .merge(health_router(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")));
//!
//! create_production_app(router, &server_config, async move {
//!     db.close().await.ok();
//! })
//! .await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, ReadyResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
