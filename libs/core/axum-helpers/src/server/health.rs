use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use utoipa::ToSchema;

/// Liveness body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub name: String,
    pub version: String,
}

/// Readiness body: overall status plus one entry per dependency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadyResponse {
    /// `ready` or `not ready`
    pub status: String,
    /// `connected` or `disconnected` per checked dependency
    pub checks: BTreeMap<String, String>,
}

pub type HealthCheckFuture<'a> = Pin<Box<dyn Future<Output = Result<(), String>> + Send + 'a>>;

/// Runs `checks` concurrently. `503` when any fails.
pub async fn run_health_checks(
    checks: Vec<(&str, HealthCheckFuture<'_>)>,
) -> (StatusCode, Json<ReadyResponse>) {
    let (names, futures): (Vec<_>, Vec<_>) = checks.into_iter().unzip();
    let results = join_all(futures).await;

    let mut all_healthy = true;
    let mut statuses = BTreeMap::new();
    for (name, result) in names.into_iter().zip(results) {
        let status = match result {
            Ok(()) => "connected",
            Err(e) => {
                tracing::error!(check = name, error = %e, "Readiness check failed");
                all_healthy = false;
                "disconnected"
            }
        };
        statuses.insert(name.to_string(), status.to_string());
    }

    let body = ReadyResponse {
        status: if all_healthy { "ready" } else { "not ready" }.to_string(),
        checks: statuses,
    };
    let status = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(body))
}

#[derive(Clone, Copy)]
struct AppInfo {
    name: &'static str,
    version: &'static str,
}

async fn health_handler(State(app): State<AppInfo>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        name: app.name.to_string(),
        version: app.version.to_string(),
    })
}

/// `GET /health`, always `200` while the process serves requests.
pub fn health_router(name: &'static str, version: &'static str) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(AppInfo { name, version })
}
