use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the similarity backend and weights this process runs with.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-analyzer",
        "similarity_backend": state.engine.backend_label(),
        "weights": state.engine.weights(),
    }))
}
