//! TF-IDF vectorizer over a bounded vocabulary.
//!
//! Conventions (frozen at fit time and persisted with the artifact):
//! - tokens are whitespace-separated words of normalized text, at least 2 chars
//! - vocabulary = top `max_features` terms by document frequency, ties by term
//! - column indices follow lexicographic term order
//! - idf = ln((1 + n) / (1 + df)) + 1, tf = raw count, rows L2-normalised

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::classifier::error::{ClassifierError, ClassifierResult};

pub const DEFAULT_MAX_FEATURES: usize = 5000;
pub const VECTORIZER_SCHEMA_VERSION: u32 = 1;

const MIN_TOKEN_CHARS: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Feature vector
// ────────────────────────────────────────────────────────────────────────────

/// Sparse row with a fixed dimensionality. Entries are sorted by column.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn new(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|(idx, value)| *idx < dim && *value != 0.0);
        entries.sort_by_key(|(idx, _)| *idx);
        Self { dim, entries }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |(idx, _)| *idx)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Persisted form
// ────────────────────────────────────────────────────────────────────────────

/// The on-disk vocabulary table: `terms[i]` owns column `i`, weighted by `idf[i]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorizerState {
    pub schema_version: u32,
    pub max_features: usize,
    pub terms: Vec<String>,
    pub idf: Vec<f64>,
}

#[derive(Debug, Clone)]
struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Vectorizer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    vocabulary: Option<Vocabulary>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features: max_features.max(1),
            vocabulary: None,
        }
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }

    pub fn is_fitted(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// Number of columns, 0 before fit.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.as_ref().map_or(0, |v| v.terms.len())
    }

    pub fn terms(&self) -> &[String] {
        match &self.vocabulary {
            Some(vocab) => &vocab.terms,
            None => &[],
        }
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        let vocab = self.vocabulary.as_ref()?;
        vocab.index.get(term).map(|&idx| vocab.idf[idx])
    }

    /// Learns a fresh vocabulary and idf table, discarding any previous fit.
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) -> ClassifierResult<()> {
        self.vocabulary = None;
        if corpus.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }

        let n_docs = corpus.len();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in corpus {
            let unique: BTreeSet<&str> = tokenize(doc.as_ref()).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        if doc_freq.is_empty() {
            return Err(ClassifierError::EmptyVocabulary);
        }

        let mut ranked: Vec<(&str, usize)> = doc_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);
        ranked.sort_by(|a, b| a.0.cmp(b.0));

        let terms: Vec<String> = ranked.iter().map(|(term, _)| term.to_string()).collect();
        let idf: Vec<f64> = ranked
            .iter()
            .map(|(_, df)| smoothed_idf(n_docs, *df))
            .collect();

        self.vocabulary = Some(Vocabulary::new(terms, idf));
        Ok(())
    }

    /// Projects `text` onto the fitted vocabulary. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> ClassifierResult<FeatureVector> {
        let vocab = self
            .vocabulary
            .as_ref()
            .ok_or(ClassifierError::ModelNotTrained)?;

        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokenize(text) {
            if let Some(&idx) = vocab.index.get(token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * vocab.idf[idx]))
            .collect();
        // Fixed summation order keeps the norm bit-for-bit reproducible.
        entries.sort_by_key(|(idx, _)| *idx);

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= norm;
            }
        }

        Ok(FeatureVector::new(vocab.terms.len(), entries))
    }

    pub fn fit_transform<S: AsRef<str>>(
        &mut self,
        corpus: &[S],
    ) -> ClassifierResult<Vec<FeatureVector>> {
        self.fit(corpus)?;
        corpus.iter().map(|doc| self.transform(doc.as_ref())).collect()
    }

    pub fn to_state(&self) -> ClassifierResult<VectorizerState> {
        let vocab = self
            .vocabulary
            .as_ref()
            .ok_or(ClassifierError::ModelNotTrained)?;
        Ok(VectorizerState {
            schema_version: VECTORIZER_SCHEMA_VERSION,
            max_features: self.max_features,
            terms: vocab.terms.clone(),
            idf: vocab.idf.clone(),
        })
    }

    /// Rebuilds a fitted vectorizer, rejecting structurally inconsistent tables.
    pub fn from_state(state: VectorizerState) -> ClassifierResult<Self> {
        if state.schema_version != VECTORIZER_SCHEMA_VERSION {
            return Err(ClassifierError::CorruptArtifact(format!(
                "vectorizer schema version {} is not supported",
                state.schema_version
            )));
        }
        if state.terms.len() != state.idf.len() {
            return Err(ClassifierError::CorruptArtifact(format!(
                "vectorizer has {} terms but {} idf weights",
                state.terms.len(),
                state.idf.len()
            )));
        }
        if state.terms.is_empty() || state.terms.len() > state.max_features {
            return Err(ClassifierError::CorruptArtifact(format!(
                "vectorizer vocabulary size {} outside 1..={}",
                state.terms.len(),
                state.max_features
            )));
        }
        if state.idf.iter().any(|w| !w.is_finite() || *w <= 0.0) {
            return Err(ClassifierError::CorruptArtifact(
                "vectorizer idf weights must be finite and positive".to_string(),
            ));
        }

        let expected = state.terms.len();
        let vocab = Vocabulary::new(state.terms, state.idf);
        if vocab.index.len() != expected {
            return Err(ClassifierError::CorruptArtifact(
                "vectorizer vocabulary contains duplicate terms".to_string(),
            ));
        }

        Ok(Self {
            max_features: state.max_features,
            vocabulary: Some(vocab),
        })
    }
}

impl Vocabulary {
    fn new(terms: Vec<String>, idf: Vec<f64>) -> Self {
        let index = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();
        Self { terms, index, idf }
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
}

fn smoothed_idf(n_docs: usize, df: usize) -> f64 {
    ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
}
