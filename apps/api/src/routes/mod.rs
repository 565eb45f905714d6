pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/upload-resume/", post(handlers::handle_upload_resume))
        .route("/upload-resume", post(handlers::handle_upload_resume))
        .route("/scoring-rules", get(handlers::handle_scoring_rules))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
