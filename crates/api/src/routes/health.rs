use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    upstream_healthy: bool,
    active_sessions: usize,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let upstream_healthy = state.payroll.ping().await;
    Json(HealthResponse {
        status: if upstream_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        upstream_healthy,
        active_sessions: state.sessions.len().await,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
