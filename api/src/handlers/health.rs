use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub users: usize,
}

/// `GET /`. The client pings this to see whether the API is reachable at all.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "API is up to date." }))
}

/// Health check for load balancers.
///
/// Loads the user list as a smoke test. The store never errors on load, so an
/// unreadable file shows up here as `users: 0` rather than a failed check.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let users = state.users.load().await.len();

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            users,
        }),
    )
}
