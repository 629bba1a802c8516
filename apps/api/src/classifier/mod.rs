//! Resume classification pipeline.
//!
//! extraction → normalisation → TF-IDF → naive Bayes for the category, and an
//! independent rule-based quality rating over the raw text.
//!
//! `ResumeClassifier` is the only entry point. It owns the trained state behind a
//! single reader/writer lock: `classify` takes a read guard for the whole
//! pipeline, `train` holds the write guard until the new model is persisted and
//! swapped in, so readers never observe a half-trained model.

pub mod error;
pub mod extractor;
pub mod models;
pub mod naive_bayes;
pub mod preprocessor;
pub mod quality;
pub mod store;
pub mod vectorizer;

use std::path::PathBuf;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, warn};

pub use error::{ClassifierError, ClassifierResult};
pub use models::{Classification, DocumentInput, QualityRating, TrainingSample};

use crate::classifier::naive_bayes::MultinomialNb;
use crate::classifier::store::{ModelArtifact, ModelStore, TrainedModel};
use crate::classifier::vectorizer::TfidfVectorizer;

/// Public view of the facade's state.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ModelStatus {
    pub trained: bool,
    pub categories: Vec<String>,
    pub vocabulary_size: usize,
}

pub struct ResumeClassifier {
    store: ModelStore,
    max_features: usize,
    state: RwLock<Option<TrainedModel>>,
}

impl ResumeClassifier {
    /// Opens the classifier backed by `model_dir`.
    ///
    /// Never fails: a missing artifact starts untrained, and so does a corrupt
    /// one (logged at `warn`).
    pub fn open(model_dir: impl Into<PathBuf>, max_features: usize) -> Self {
        let store = ModelStore::new(model_dir);
        let trained = match store.load() {
            Ok(artifact) => artifact.trained,
            Err(e) => {
                warn!(dir = %store.dir().display(), "ignoring unusable model artifact: {e}");
                None
            }
        };

        if let Some(t) = &trained {
            info!(
                categories = t.model.classes().len(),
                vocabulary = t.vectorizer.vocabulary_size(),
                "loaded trained model"
            );
        } else {
            info!(dir = %store.dir().display(), "no trained model, classifier is untrained");
        }

        Self {
            store,
            max_features,
            state: RwLock::new(trained),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.state.read().is_some()
    }

    pub fn status(&self) -> ModelStatus {
        match &*self.state.read() {
            Some(t) => ModelStatus {
                trained: true,
                categories: t.model.classes().to_vec(),
                vocabulary_size: t.vectorizer.vocabulary_size(),
            },
            None => ModelStatus {
                trained: false,
                categories: vec![],
                vocabulary_size: 0,
            },
        }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Fits a fresh vectorizer and model on `samples`, persists them, then
    /// swaps them in. On any failure the previous state is left untouched.
    pub fn train(&self, samples: &[TrainingSample]) -> ClassifierResult<ModelStatus> {
        if samples.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }

        let mut state = self.state.write();

        let normalized: Vec<String> = samples
            .iter()
            .map(|s| preprocessor::normalize(&s.text))
            .collect();
        let labels: Vec<String> = samples.iter().map(|s| s.category.clone()).collect();

        let mut vectorizer = TfidfVectorizer::new(self.max_features);
        let vectors = vectorizer.fit_transform(&normalized)?;
        let mut model = MultinomialNb::default();
        model.fit(&vectors, &labels)?;

        let trained = TrainedModel {
            vectorizer,
            model,
            num_samples: samples.len(),
            trained_at: Utc::now(),
        };
        self.store.save(&ModelArtifact::from_trained(trained.clone()))?;

        info!(
            samples = samples.len(),
            categories = trained.model.classes().len(),
            vocabulary = trained.vectorizer.vocabulary_size(),
            "classifier trained"
        );

        *state = Some(trained);
        drop(state);
        Ok(self.status())
    }

    /// Re-reads the artifact from disk, replacing the in-memory state.
    pub fn reload(&self) -> ClassifierResult<ModelStatus> {
        let artifact = self.store.load()?;
        *self.state.write() = artifact.trained;
        Ok(self.status())
    }

    pub fn classify(&self, input: &DocumentInput) -> ClassifierResult<Classification> {
        let state = self.state.read();
        let trained = state.as_ref().ok_or(ClassifierError::ModelNotTrained)?;

        let text = match input {
            DocumentInput::FileRef(path) => extractor::extract_file(path)?,
            DocumentInput::RawText(text) => text.clone(),
        };

        let normalized = preprocessor::normalize(&text);
        let vector = trained.vectorizer.transform(&normalized)?;
        let category = trained.model.predict(&vector)?.to_string();
        let quality = quality::score(&text);

        debug!(
            %category,
            %quality,
            chars = text.len(),
            features = vector.nnz(),
            "classified resume"
        );

        Ok(Classification { category, quality })
    }

    /// Convenience wrapper for literal resume text.
    pub fn classify_text(&self, text: &str) -> ClassifierResult<Classification> {
        self.classify(&DocumentInput::RawText(text.to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::sample_dataset;
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    fn trained_classifier(dir: &std::path::Path) -> ResumeClassifier {
        let classifier = ResumeClassifier::open(dir, 5000);
        classifier.train(&sample_dataset()).unwrap();
        classifier
    }

    #[test]
    fn test_starts_untrained_without_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = ResumeClassifier::open(dir.path(), 5000);
        assert!(!classifier.is_trained());
        assert!(matches!(
            classifier.classify_text("anything"),
            Err(ClassifierError::ModelNotTrained)
        ));
    }

    #[test]
    fn test_train_then_classify() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = trained_classifier(dir.path());

        let status = classifier.status();
        assert!(status.trained);
        assert_eq!(status.categories, vec!["Engineering", "Finance", "Healthcare"]);

        let result = classifier
            .classify_text("Nurse with ICU patient care and clinical hospital experience")
            .unwrap();
        assert_eq!(result.category, "Healthcare");

        let result = classifier
            .classify_text("Rust backend engineer, Kubernetes and distributed systems")
            .unwrap();
        assert_eq!(result.category, "Engineering");
    }

    #[test]
    fn test_quality_is_independent_of_category() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = trained_classifier(dir.path());
        let text = "Summary. Experience: audit and tax. Education. Skills. Projects. \
                    Achievements. Certifications.";
        let result = classifier.classify_text(text).unwrap();
        assert_eq!(result.quality, QualityRating::Best);
        assert_eq!(result.quality, quality::score(text));
    }

    #[test]
    fn test_classify_file_input() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = trained_classifier(dir.path());

        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"Accountant: audit, ledger reconciliation, tax filings")
            .unwrap();
        let result = classifier
            .classify(&DocumentInput::FileRef(file.path().to_path_buf()))
            .unwrap();
        assert_eq!(result.category, "Finance");
    }

    #[test]
    fn test_classify_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = trained_classifier(dir.path());
        let file = tempfile::Builder::new().suffix(".odt").tempfile().unwrap();
        assert!(matches!(
            classifier.classify(&DocumentInput::FileRef(file.path().to_path_buf())),
            Err(ClassifierError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_reopen_restores_trained_state() {
        let dir = tempfile::tempdir().unwrap();
        let first = trained_classifier(dir.path());
        let query = "clinical pharmacy and medication counseling";
        let expected = first.classify_text(query).unwrap();

        let reopened = ResumeClassifier::open(dir.path(), 5000);
        assert!(reopened.is_trained());
        assert_eq!(reopened.classify_text(query).unwrap(), expected);
    }

    #[test]
    fn test_corrupt_artifact_opens_untrained() {
        let dir = tempfile::tempdir().unwrap();
        trained_classifier(dir.path());
        std::fs::remove_file(dir.path().join(store::VECTORIZER_FILE)).unwrap();

        let reopened = ResumeClassifier::open(dir.path(), 5000);
        assert!(!reopened.is_trained());
        assert!(matches!(
            reopened.reload(),
            Err(ClassifierError::CorruptArtifact(_))
        ));
    }

    #[test]
    fn test_empty_dataset_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = trained_classifier(dir.path());
        let before = classifier.status();

        assert!(matches!(
            classifier.train(&[]),
            Err(ClassifierError::EmptyDataset)
        ));
        assert_eq!(classifier.status(), before);
        assert!(ResumeClassifier::open(dir.path(), 5000).is_trained());
    }

    #[test]
    fn test_empty_dataset_on_untrained_stays_untrained() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = ResumeClassifier::open(dir.path(), 5000);
        assert!(classifier.train(&[]).is_err());
        assert!(!classifier.is_trained());
    }

    #[test]
    fn test_retrain_replaces_categories() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = trained_classifier(dir.path());
        classifier
            .train(&[
                TrainingSample::new("chef kitchen menu", "Hospitality"),
                TrainingSample::new("teacher classroom curriculum", "Education"),
            ])
            .unwrap();
        assert_eq!(classifier.status().categories, vec!["Education", "Hospitality"]);
    }

    #[test]
    fn test_max_features_bounds_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = ResumeClassifier::open(dir.path(), 10);
        let status = classifier.train(&sample_dataset()).unwrap();
        assert_eq!(status.vocabulary_size, 10);
    }

    fn alternate_dataset() -> Vec<TrainingSample> {
        vec![
            TrainingSample::new("auditor: financial audit, budgeting and ledger review", "Accounting"),
            TrainingSample::new("accountant with budgeting, tax and financial reports", "Accounting"),
            TrainingSample::new("chef: kitchen, menu planning and catering", "Hospitality"),
            TrainingSample::new("hotel front desk, guest service and events", "Hospitality"),
        ]
    }

    #[test]
    fn test_concurrent_classify_sees_whole_models() {
        let query = "financial audit and budgeting";

        let other_dir = tempfile::tempdir().unwrap();
        let other = ResumeClassifier::open(other_dir.path(), 5000);
        other.train(&alternate_dataset()).unwrap();
        let alternate = other.classify_text(query).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let classifier = Arc::new(trained_classifier(dir.path()));
        let baseline = classifier.classify_text(query).unwrap();
        assert_eq!(baseline.category, "Finance");
        assert_eq!(alternate.category, "Accounting");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let classifier = Arc::clone(&classifier);
                std::thread::spawn(move || {
                    let mut seen = Vec::new();
                    for round in 0..25 {
                        if i % 4 == 0 && round % 5 == 0 {
                            let dataset = if (i / 4 + round / 5) % 2 == 0 {
                                alternate_dataset()
                            } else {
                                sample_dataset()
                            };
                            classifier.train(&dataset).unwrap();
                        }
                        seen.push(classifier.classify_text(query).unwrap());
                    }
                    seen
                })
            })
            .collect();

        for handle in handles {
            for result in handle.join().unwrap() {
                assert!(
                    result == baseline || result == alternate,
                    "classified against a mixed model: {result:?}"
                );
            }
        }

        let status = classifier.status();
        assert!(
            status.categories == vec!["Engineering", "Finance", "Healthcare"]
                || status.categories == vec!["Accounting", "Hospitality"],
            "{:?}",
            status.categories
        );
    }
}
