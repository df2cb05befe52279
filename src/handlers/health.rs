use axum::{extract::State, Json};
use serde::Serialize;

use crate::session::SessionStore;
use crate::version::GIT_VERSION;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    git_version: &'static str,
    live_sessions: usize,
}

pub async fn health_check(State(store): State<SessionStore>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        git_version: GIT_VERSION,
        live_sessions: store.len().await,
    })
}
