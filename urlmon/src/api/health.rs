//! Liveness / readiness probes.

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse};

/// GET /live
pub async fn live() -> impl IntoResponse {
    "ok"
}

/// GET /ready
///
/// 200 while the process wishes to receive traffic, 500 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    if state.readiness.is_ready() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "not ready")
    }
}
