use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::classifier::ClassifierError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error("Upload error: {0}")]
    Upload(#[from] MultipartError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upload(e) => (StatusCode::BAD_REQUEST, "UPLOAD_ERROR", e.body_text()),
            AppError::Classifier(e) => classifier_error_parts(e),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

fn classifier_error_parts(e: &ClassifierError) -> (StatusCode, &'static str, String) {
    match e {
        ClassifierError::UnsupportedFormat { .. } => (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "UNSUPPORTED_FORMAT",
            e.to_string(),
        ),
        ClassifierError::ExtractionFailed { .. } => {
            tracing::warn!("Extraction failed: {e}");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EXTRACTION_FAILED",
                e.to_string(),
            )
        }
        ClassifierError::ModelNotTrained => (
            StatusCode::SERVICE_UNAVAILABLE,
            "MODEL_NOT_TRAINED",
            e.to_string(),
        ),
        ClassifierError::EmptyDataset | ClassifierError::EmptyVocabulary => {
            (StatusCode::BAD_REQUEST, "EMPTY_DATASET", e.to_string())
        }
        ClassifierError::CorruptArtifact(_) => {
            tracing::error!("Corrupt artifact: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CORRUPT_ARTIFACT",
                "The stored model is unusable".to_string(),
            )
        }
        ClassifierError::DimensionMismatch { .. }
        | ClassifierError::LabelCountMismatch { .. }
        | ClassifierError::Io(_) => {
            tracing::error!("Classifier error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_and_code(err: AppError) -> (StatusCode, String) {
        let (status, code, _) = match &err {
            AppError::Classifier(e) => classifier_error_parts(e),
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", m.clone()),
            _ => unreachable!(),
        };
        assert_eq!(err.into_response().status(), status);
        (status, code.to_string())
    }

    #[test]
    fn test_each_core_error_has_distinct_code() {
        let cases = vec![
            ClassifierError::UnsupportedFormat {
                extension: ".odt".to_string(),
            },
            ClassifierError::extraction("cv.pdf", "bad xref"),
            ClassifierError::ModelNotTrained,
            ClassifierError::EmptyDataset,
            ClassifierError::CorruptArtifact("missing classifier.json".to_string()),
        ];
        let mut codes: Vec<String> = cases
            .into_iter()
            .map(|e| status_and_code(AppError::from(e)).1)
            .collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), 5);
    }

    #[test]
    fn test_model_not_trained_is_503() {
        let (status, code) = status_and_code(ClassifierError::ModelNotTrained.into());
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(code, "MODEL_NOT_TRAINED");
    }

    #[test]
    fn test_unsupported_format_is_415() {
        let (status, _) = status_and_code(
            ClassifierError::UnsupportedFormat {
                extension: ".rtf".to_string(),
            }
            .into(),
        );
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_validation_is_400() {
        let (status, code) = status_and_code(AppError::Validation("no file".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "VALIDATION_ERROR");
    }
}
