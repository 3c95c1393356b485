use axum::Router;

pub mod health;
pub mod roles;
pub mod users;

/// The resource routes, without the `/api` prefix `create_router` adds.
///
/// Every sub-router has its state applied, so the result is stateless.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest("/roles", roles::roles_router(state))
        .nest("/permissions", roles::permissions_router(state))
        .nest("/users", users::router(state))
}

/// `/ready`, checking the database.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
