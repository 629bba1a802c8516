pub mod classify;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/classify", post(classify::handle_classify_upload))
        .route("/classify/text", post(classify::handle_classify_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
