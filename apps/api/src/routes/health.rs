use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version, grading backend and load.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let active_sessions = state.sessions.len().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "interview-api",
        "grading_backend": state.evaluator.backend(),
        "email_enabled": state.config.smtp.is_some(),
        "active_sessions": active_sessions,
    }))
}
