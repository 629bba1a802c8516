use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus whether a trained model is loaded.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let model = state.classifier.status();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-classifier-api",
        "model": model
    }))
}
