//! Multinomial naive Bayes over TF-IDF rows.
//!
//! Feature likelihoods use additive (Laplace, `alpha = 1.0`) smoothing:
//! `ln((count[c][j] + alpha) / (sum_j count[c][j] + alpha * n_features))`.
//! Priors are empirical label frequencies. All scoring happens in log-space.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classifier::error::{ClassifierError, ClassifierResult};
use crate::classifier::vectorizer::FeatureVector;

pub const DEFAULT_ALPHA: f64 = 1.0;
pub const MODEL_SCHEMA_VERSION: u32 = 1;

/// On-disk parameter table. Row `i` of every per-class table belongs to `classes[i]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelState {
    pub schema_version: u32,
    pub alpha: f64,
    pub classes: Vec<String>,
    pub class_count: Vec<u64>,
    pub class_log_prior: Vec<f64>,
    pub feature_log_prob: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
struct Parameters {
    classes: Vec<String>,
    class_count: Vec<u64>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
    n_features: usize,
}

#[derive(Debug, Clone)]
pub struct MultinomialNb {
    alpha: f64,
    params: Option<Parameters>,
}

impl Default for MultinomialNb {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl MultinomialNb {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            params: None,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.params.is_some()
    }

    /// Sorted class labels seen during training; empty before fit.
    pub fn classes(&self) -> &[String] {
        match &self.params {
            Some(params) => &params.classes,
            None => &[],
        }
    }

    pub fn n_features(&self) -> usize {
        self.params.as_ref().map_or(0, |p| p.n_features)
    }

    pub fn fit(&mut self, vectors: &[FeatureVector], labels: &[String]) -> ClassifierResult<()> {
        if vectors.is_empty() {
            return Err(ClassifierError::EmptyDataset);
        }
        if vectors.len() != labels.len() {
            return Err(ClassifierError::LabelCountMismatch {
                vectors: vectors.len(),
                labels: labels.len(),
            });
        }

        let n_features = vectors[0].dim();
        if let Some(bad) = vectors.iter().find(|v| v.dim() != n_features) {
            return Err(ClassifierError::DimensionMismatch {
                expected: n_features,
                actual: bad.dim(),
            });
        }

        // BTreeMap gives the sorted class order used for tie-breaking.
        let mut per_class: BTreeMap<&str, (u64, Vec<f64>)> = BTreeMap::new();
        for (vector, label) in vectors.iter().zip(labels) {
            let (count, features) = per_class
                .entry(label.as_str())
                .or_insert_with(|| (0, vec![0.0; n_features]));
            *count += 1;
            for &(idx, value) in vector.entries() {
                features[idx] += value;
            }
        }

        let n_samples = vectors.len() as f64;
        let smoothing = self.alpha * n_features as f64;
        let mut params = Parameters {
            classes: Vec::with_capacity(per_class.len()),
            class_count: Vec::with_capacity(per_class.len()),
            class_log_prior: Vec::with_capacity(per_class.len()),
            feature_log_prob: Vec::with_capacity(per_class.len()),
            n_features,
        };

        for (label, (count, features)) in per_class {
            let total: f64 = features.iter().sum::<f64>() + smoothing;
            let log_total = total.ln();
            params.classes.push(label.to_string());
            params.class_count.push(count);
            params.class_log_prior.push((count as f64 / n_samples).ln());
            params.feature_log_prob.push(
                features
                    .iter()
                    .map(|f| (f + self.alpha).ln() - log_total)
                    .collect(),
            );
        }

        self.params = Some(params);
        Ok(())
    }

    /// Joint log-likelihood per class, in `classes()` order.
    pub fn joint_log_likelihood(&self, vector: &FeatureVector) -> ClassifierResult<Vec<f64>> {
        let params = self.params.as_ref().ok_or(ClassifierError::ModelNotTrained)?;
        if vector.dim() != params.n_features {
            return Err(ClassifierError::DimensionMismatch {
                expected: params.n_features,
                actual: vector.dim(),
            });
        }

        Ok(params
            .class_log_prior
            .iter()
            .zip(&params.feature_log_prob)
            .map(|(prior, log_probs)| {
                prior
                    + vector
                        .entries()
                        .iter()
                        .map(|&(idx, value)| log_probs[idx] * value)
                        .sum::<f64>()
            })
            .collect())
    }

    /// Highest-scoring class; on a tie the earlier class in `classes()` wins.
    pub fn predict(&self, vector: &FeatureVector) -> ClassifierResult<&str> {
        let scores = self.joint_log_likelihood(vector)?;
        let mut best = 0;
        for (idx, score) in scores.iter().enumerate().skip(1) {
            if *score > scores[best] {
                best = idx;
            }
        }
        Ok(self.classes()[best].as_str())
    }

    pub fn to_state(&self) -> ClassifierResult<ModelState> {
        let params = self.params.as_ref().ok_or(ClassifierError::ModelNotTrained)?;
        Ok(ModelState {
            schema_version: MODEL_SCHEMA_VERSION,
            alpha: self.alpha,
            classes: params.classes.clone(),
            class_count: params.class_count.clone(),
            class_log_prior: params.class_log_prior.clone(),
            feature_log_prob: params.feature_log_prob.clone(),
        })
    }

    pub fn from_state(state: ModelState) -> ClassifierResult<Self> {
        let corrupt = |msg: String| Err(ClassifierError::CorruptArtifact(msg));

        if state.schema_version != MODEL_SCHEMA_VERSION {
            return corrupt(format!(
                "model schema version {} is not supported",
                state.schema_version
            ));
        }
        let n_classes = state.classes.len();
        if n_classes == 0 {
            return corrupt("model has no classes".to_string());
        }
        if state.class_count.len() != n_classes
            || state.class_log_prior.len() != n_classes
            || state.feature_log_prob.len() != n_classes
        {
            return corrupt(format!(
                "model tables disagree on class count (expected {n_classes})"
            ));
        }
        if state.classes.windows(2).any(|w| w[0] >= w[1]) {
            return corrupt("model classes must be sorted and unique".to_string());
        }
        let n_features = state.feature_log_prob[0].len();
        if n_features == 0 || state.feature_log_prob.iter().any(|row| row.len() != n_features) {
            return corrupt("model feature table is ragged or empty".to_string());
        }
        let all_finite = state.class_log_prior.iter().all(|v| v.is_finite())
            && state
                .feature_log_prob
                .iter()
                .flatten()
                .all(|v| v.is_finite());
        if !all_finite {
            return corrupt("model parameters must be finite".to_string());
        }

        Ok(Self {
            alpha: state.alpha,
            params: Some(Parameters {
                classes: state.classes,
                class_count: state.class_count,
                class_log_prior: state.class_log_prior,
                feature_log_prob: state.feature_log_prob,
                n_features,
            }),
        })
    }
}
