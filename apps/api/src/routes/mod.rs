pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::resume::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resumes/parse", post(handlers::handle_parse))
        .route("/api/v1/resumes/keywords", post(handlers::handle_keywords))
        .route("/api/v1/resumes/score", post(handlers::handle_score))
        .route(
            "/api/v1/resumes/analyze",
            post(handlers::handle_analyze).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}
