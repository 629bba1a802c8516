use thiserror::Error;

/// Failures raised by the classification pipeline.
///
/// Every variant is distinguishable at the HTTP boundary; see `AppError`.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Failed to extract text from {source_name}: {reason}")]
    ExtractionFailed { source_name: String, reason: String },

    #[error("Model needs to be trained first")]
    ModelNotTrained,

    #[error("Cannot train on an empty dataset")]
    EmptyDataset,

    #[error("Training corpus produced an empty vocabulary")]
    EmptyVocabulary,

    #[error("Feature vector has {actual} dimensions, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Got {vectors} feature vectors but {labels} labels")]
    LabelCountMismatch { vectors: usize, labels: usize },

    #[error("Corrupt model artifact: {0}")]
    CorruptArtifact(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClassifierError {
    pub(crate) fn extraction(source_name: impl Into<String>, reason: impl ToString) -> Self {
        ClassifierError::ExtractionFailed {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type ClassifierResult<T> = Result<T, ClassifierError>;
