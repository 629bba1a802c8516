//! On-disk model artifact.
//!
//! Layout of the model directory:
//! - `vectorizer.json`  vocabulary table + idf weights (`VectorizerState`)
//! - `classifier.json`  per-class parameter table (`ModelState`)
//! - `model_info.json`  metadata, written last (`ModelMetadata`)
//!
//! A missing `model_info.json` means "untrained". Metadata that claims
//! `is_trained` while the other tables are missing or inconsistent is a
//! `CorruptArtifact`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info};

use crate::classifier::error::{ClassifierError, ClassifierResult};
use crate::classifier::naive_bayes::{ModelState, MultinomialNb};
use crate::classifier::vectorizer::{TfidfVectorizer, VectorizerState};

pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const MODEL_FILE: &str = "classifier.json";
pub const METADATA_FILE: &str = "model_info.json";
pub const METADATA_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelMetadata {
    pub schema_version: u32,
    pub is_trained: bool,
    pub categories: Vec<String>,
    #[serde(default)]
    pub vocabulary_size: usize,
    #[serde(default)]
    pub num_samples: usize,
    #[serde(default)]
    pub trained_at: Option<DateTime<Utc>>,
}

impl ModelMetadata {
    pub fn untrained() -> Self {
        Self {
            schema_version: METADATA_SCHEMA_VERSION,
            is_trained: false,
            categories: vec![],
            vocabulary_size: 0,
            num_samples: 0,
            trained_at: None,
        }
    }

    fn describe(trained: &TrainedModel) -> Self {
        Self {
            schema_version: METADATA_SCHEMA_VERSION,
            is_trained: true,
            categories: trained.model.classes().to_vec(),
            vocabulary_size: trained.vectorizer.vocabulary_size(),
            num_samples: trained.num_samples,
            trained_at: Some(trained.trained_at),
        }
    }
}

/// Fitted vectorizer + model pair. Both halves always come from the same fit.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub vectorizer: TfidfVectorizer,
    pub model: MultinomialNb,
    pub num_samples: usize,
    pub trained_at: DateTime<Utc>,
}

/// Everything persisted for one classifier.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    pub trained: Option<TrainedModel>,
}

impl ModelArtifact {
    pub fn untrained() -> Self {
        Self {
            metadata: ModelMetadata::untrained(),
            trained: None,
        }
    }

    pub fn from_trained(trained: TrainedModel) -> Self {
        Self {
            metadata: ModelMetadata::describe(&trained),
            trained: Some(trained),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.trained.is_some()
    }
}

/// Filesystem-backed artifact store rooted at one directory.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the artifact. Metadata goes last, so it never claims
    /// `is_trained` unless both parameter tables were written by this call.
    pub fn save(&self, artifact: &ModelArtifact) -> ClassifierResult<()> {
        fs::create_dir_all(&self.dir)?;

        let metadata = match &artifact.trained {
            Some(trained) => {
                // Invalidate first: an interrupted save must not pair old
                // metadata with half-replaced tables.
                if self.dir.join(METADATA_FILE).exists() {
                    self.write_json(METADATA_FILE, &ModelMetadata::untrained())?;
                }
                self.write_json(VECTORIZER_FILE, &trained.vectorizer.to_state()?)?;
                self.write_json(MODEL_FILE, &trained.model.to_state()?)?;
                ModelMetadata::describe(trained)
            }
            None => ModelMetadata::untrained(),
        };
        self.write_json(METADATA_FILE, &metadata)?;

        info!(
            dir = %self.dir.display(),
            trained = metadata.is_trained,
            categories = metadata.categories.len(),
            "model artifact saved"
        );
        Ok(())
    }

    /// Reads the artifact. A missing metadata file yields an untrained artifact.
    pub fn load(&self) -> ClassifierResult<ModelArtifact> {
        let metadata_path = self.dir.join(METADATA_FILE);
        if !metadata_path.is_file() {
            debug!(path = %metadata_path.display(), "no model metadata, starting untrained");
            return Ok(ModelArtifact::untrained());
        }

        let metadata: ModelMetadata = self.read_json(METADATA_FILE)?;
        if metadata.schema_version != METADATA_SCHEMA_VERSION {
            return Err(ClassifierError::CorruptArtifact(format!(
                "metadata schema version {} is not supported",
                metadata.schema_version
            )));
        }
        if !metadata.is_trained {
            return Ok(ModelArtifact {
                metadata: ModelMetadata {
                    categories: vec![],
                    ..metadata
                },
                trained: None,
            });
        }

        let vectorizer_state: VectorizerState = self.read_json(VECTORIZER_FILE)?;
        let model_state: ModelState = self.read_json(MODEL_FILE)?;
        let vectorizer = TfidfVectorizer::from_state(vectorizer_state)?;
        let model = MultinomialNb::from_state(model_state)?;

        if model.n_features() != vectorizer.vocabulary_size() {
            return Err(ClassifierError::CorruptArtifact(format!(
                "model expects {} features but vocabulary has {} terms",
                model.n_features(),
                vectorizer.vocabulary_size()
            )));
        }
        if metadata.vocabulary_size != vectorizer.vocabulary_size() {
            return Err(ClassifierError::CorruptArtifact(format!(
                "metadata records {} terms but vocabulary has {}",
                metadata.vocabulary_size,
                vectorizer.vocabulary_size()
            )));
        }
        if metadata.categories != model.classes() {
            return Err(ClassifierError::CorruptArtifact(
                "metadata categories do not match model classes".to_string(),
            ));
        }

        let trained = TrainedModel {
            vectorizer,
            model,
            num_samples: metadata.num_samples,
            trained_at: metadata.trained_at.unwrap_or_else(Utc::now),
        };
        Ok(ModelArtifact {
            metadata,
            trained: Some(trained),
        })
    }

    fn write_json<T: Serialize>(&self, file_name: &str, value: &T) -> ClassifierResult<()> {
        let target = self.dir.join(file_name);
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer(&mut tmp, value)
            .map_err(|e| ClassifierError::Io(std::io::Error::other(e)))?;
        tmp.flush()?;
        tmp.persist(&target).map_err(|e| ClassifierError::Io(e.error))?;
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, file_name: &str) -> ClassifierResult<T> {
        let path = self.dir.join(file_name);
        let bytes = fs::read(&path).map_err(|e| {
            ClassifierError::CorruptArtifact(format!("cannot read {}: {e}", path.display()))
        })?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ClassifierError::CorruptArtifact(format!("cannot parse {}: {e}", path.display()))
        })
    }
}
