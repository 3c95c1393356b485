//! Shared application state.

/// Cloned into the routers that need it; the connection is a pool handle.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
}
