use std::sync::Arc;

use crate::classifier::ResumeClassifier;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one classifier instance. Its internal lock serialises training against reads.
    pub classifier: Arc<ResumeClassifier>,
    pub config: Config,
}

impl AppState {
    pub fn new(classifier: ResumeClassifier, config: Config) -> Self {
        Self {
            classifier: Arc::new(classifier),
            config,
        }
    }
}
