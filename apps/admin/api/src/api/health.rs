use crate::state::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

/// Readiness: `200` when the database answers `SELECT 1`, `503` otherwise.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            database::postgres::check_health(&state.db)
                .await
                .map_err(|e| e.to_string())
        }),
    )];

    run_health_checks(checks).await.into_response()
}
