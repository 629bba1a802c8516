//! Resume classification service: category prediction with a TF-IDF + naive
//! Bayes model and a rule-based quality rating.

pub mod classifier;
pub mod config;
pub mod errors;
pub mod routes;
pub mod state;
pub mod training;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialises structured logging. `RUST_LOG` wins when set; otherwise `default_level`
/// applies to this crate, its binaries and the HTTP trace layer.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "resume_classifier={default_level},resume_classifier_api={default_level},\
                 tower_http={default_level}"
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
