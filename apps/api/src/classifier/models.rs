use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One labelled resume used for training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingSample {
    pub text: String,
    pub category: String,
}

impl TrainingSample {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }
}

/// What a caller hands to `ResumeClassifier::classify`.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentInput {
    /// A document on disk; the extension picks the extractor.
    FileRef(PathBuf),
    /// Resume text supplied directly.
    RawText(String),
}

impl DocumentInput {
    /// Treats `value` as a path when a file exists there, otherwise as literal text.
    pub fn from_path_or_text(value: &str) -> Self {
        let path = PathBuf::from(value);
        if path.is_file() {
            DocumentInput::FileRef(path)
        } else {
            DocumentInput::RawText(value.to_string())
        }
    }
}

/// Coarse quality bucket. Ordered `Poor < Average < Good < Best`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QualityRating {
    Poor,
    Average,
    Good,
    Best,
}

impl QualityRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityRating::Poor => "poor",
            QualityRating::Average => "average",
            QualityRating::Good => "good",
            QualityRating::Best => "best",
        }
    }
}

impl fmt::Display for QualityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of a single classification call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub category: String,
    pub quality: QualityRating,
}
