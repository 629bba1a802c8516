//! Axum route handlers for resume classification.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::extractor::DocumentFormat;
use crate::classifier::{
    Classification, ClassifierError, DocumentInput, QualityRating, ResumeClassifier,
};
use crate::errors::AppError;
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyUploadResponse {
    pub category: String,
    pub quality: QualityRating,
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyTextRequest {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /classify
///
/// Multipart upload with a single `file` field (.txt, .pdf or .docx).
/// The upload lives in a temp file under `UPLOAD_DIR` only while it is classified.
pub async fn handle_classify_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClassifyUploadResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("uploaded file has no filename".to_string()))?;
        let data = field.bytes().await?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| AppError::Validation(format!("missing '{UPLOAD_FIELD}' field")))?;
    let format = DocumentFormat::from_path(Path::new(&filename))?;

    let classifier = Arc::clone(&state.classifier);
    let upload_dir = state.config.upload_dir.clone();
    let classification = tokio::task::spawn_blocking(move || {
        classify_upload(&classifier, &upload_dir, format, &data)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in classify: {e}")))??;

    info!(
        %filename,
        category = %classification.category,
        quality = %classification.quality,
        "classified upload"
    );

    Ok(Json(ClassifyUploadResponse {
        category: classification.category,
        quality: classification.quality,
        filename,
    }))
}

/// POST /classify/text
pub async fn handle_classify_text(
    State(state): State<AppState>,
    Json(request): Json<ClassifyTextRequest>,
) -> Result<Json<Classification>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let classifier = Arc::clone(&state.classifier);
    let classification =
        tokio::task::spawn_blocking(move || classifier.classify_text(&request.text))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in classify: {e}"))
            })??;

    Ok(Json(classification))
}

/// Writes `data` to a temp file, classifies it, and removes the file on every
/// return path when the `NamedTempFile` guard drops.
fn classify_upload(
    classifier: &ResumeClassifier,
    upload_dir: &Path,
    format: DocumentFormat,
    data: &[u8],
) -> Result<Classification, ClassifierError> {
    std::fs::create_dir_all(upload_dir)?;
    let mut temp = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile_in(upload_dir)?;
    temp.write_all(data)?;
    temp.flush()?;

    let path: PathBuf = temp.path().to_path_buf();
    classifier.classify(&DocumentInput::FileRef(path))
}
