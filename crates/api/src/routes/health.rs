//! Liveness and database reachability.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database cannot be reached.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Round-trip time of the check query.
    pub db_latency_ms: u128,
}

/// GET /health
///
/// Answers 503 while the database is unreachable so load balancers can
/// take the instance out of rotation.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let check = cursos_db::health_check(&state.pool).await;
    let db_latency_ms = started.elapsed().as_millis();

    if let Err(err) = &check {
        tracing::warn!(error = %err, "Database health check failed");
    }

    let db_healthy = check.is_ok();
    let (code, status) = if db_healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            db_latency_ms,
        }),
    )
}

/// Mount health routes at the root, outside the versioned API trees.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
