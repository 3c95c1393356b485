use axum::Extension;
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation, so startup errors get colored reports
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None).await?;

    let query_defaults = config.query_defaults();
    info!(
        per_page = query_defaults.per_page,
        max_per_page = ?query_defaults.max_per_page,
        "List query defaults"
    );

    let state = AppState { config, db };

    let api_routes = api::routes(&state).layer(Extension(query_defaults));
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // /health: liveness with name and version, /ready: database check
    let app = router
        .merge(health_router(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")))
        .merge(api::ready_router(state.clone()));

    let server_config = state.config.server.clone();
    let db = state.db.clone();

    create_production_app(app, &server_config, async move {
        info!("Shutting down: closing database connections");
        match db.close().await {
            Ok(()) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!(error = %e, "Error closing PostgreSQL"),
        }
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Admin API shutdown complete");
    Ok(())
}
