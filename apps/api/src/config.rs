use std::path::PathBuf;

use anyhow::{ensure, Context, Result};

use crate::classifier::vectorizer::DEFAULT_MAX_FEATURES;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every value has a default; malformed numbers and zero sizes fail at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub model_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub max_features: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            model_dir: std::env::var("MODEL_DIR")
                .unwrap_or_else(|_| "ml_models/trained_model".to_string())
                .into(),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "data_storage/temp".to_string())
                .into(),
            max_features: parse_nonzero_env("MAX_FEATURES", DEFAULT_MAX_FEATURES)?,
            max_upload_bytes: parse_nonzero_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_nonzero_env(key: &str, default: usize) -> Result<usize> {
    let value = parse_env(key, default)?;
    ensure!(value > 0, "{key} must be greater than zero");
    Ok(value)
}
