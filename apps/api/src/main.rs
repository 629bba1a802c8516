use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use resume_classifier::classifier::ResumeClassifier;
use resume_classifier::config::Config;
use resume_classifier::routes::build_router;
use resume_classifier::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    resume_classifier::init_tracing(&config.rust_log);

    info!("Starting Resume Classifier API v{}", env!("CARGO_PKG_VERSION"));

    // Loading is synchronous file I/O; an absent or unusable artifact starts untrained.
    let model_dir = config.model_dir.clone();
    let max_features = config.max_features;
    let classifier =
        tokio::task::spawn_blocking(move || ResumeClassifier::open(model_dir, max_features))
            .await?;
    if !classifier.is_trained() {
        info!("Model is untrained; run `resume-classifier train` before classifying");
    }

    let state = AppState::new(classifier, config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
