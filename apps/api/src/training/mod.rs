//! Offline training support: dataset loading, hold-out split, evaluation report.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::classifier::{ClassifierResult, ResumeClassifier, TrainingSample};

/// Loads a JSON array of `{"text": ..., "category": ...}` records.
/// Rows with a blank text or category are skipped.
pub fn load_dataset(path: &Path) -> Result<Vec<TrainingSample>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    let rows: Vec<TrainingSample> = serde_json::from_str(&raw)
        .with_context(|| format!("Dataset {} is not a JSON array of {{text, category}}", path.display()))?;

    let total = rows.len();
    let samples: Vec<TrainingSample> = rows
        .into_iter()
        .filter(|row| !row.text.trim().is_empty() && !row.category.trim().is_empty())
        .collect();
    if samples.len() < total {
        warn!(
            skipped = total - samples.len(),
            "dropped dataset rows with empty text or category"
        );
    }
    Ok(samples)
}

/// Deterministically shuffles and splits `samples` into `(train, test)`.
///
/// The test share is rounded up but always leaves at least one training row.
pub fn train_test_split(
    samples: &[TrainingSample],
    test_ratio: f64,
    seed: u64,
) -> Result<(Vec<TrainingSample>, Vec<TrainingSample>)> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        bail!("test ratio must be in (0, 1), got {test_ratio}");
    }
    let mut shuffled = samples.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let n_test = ((samples.len() as f64) * test_ratio).ceil() as usize;
    let n_test = n_test.min(samples.len().saturating_sub(1));
    let test = shuffled.split_off(samples.len() - n_test);
    Ok((shuffled, test))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
    pub total: usize,
}

impl ClassificationReport {
    /// Builds the report from `(expected, predicted)` label pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        // label -> (true positives, predicted count, support)
        let mut counts: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
        let mut total = 0;
        let mut correct = 0;

        for (expected, predicted) in pairs {
            total += 1;
            counts.entry(expected).or_default().2 += 1;
            counts.entry(predicted).or_default().1 += 1;
            if expected == predicted {
                correct += 1;
                counts.entry(expected).or_default().0 += 1;
            }
        }

        let classes = counts
            .into_iter()
            .map(|(label, (tp, predicted, support))| {
                let precision = ratio(tp, predicted);
                let recall = ratio(tp, support);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics {
                    label: label.to_string(),
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        Self {
            accuracy: ratio(correct, total),
            classes,
            total,
        }
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .classes
            .iter()
            .map(|c| c.label.len())
            .max()
            .unwrap_or(0)
            .max("accuracy".len());

        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9}  {:>7}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        for c in &self.classes {
            writeln!(
                f,
                "{:>width$}  {:>9.2}  {:>9.2}  {:>9.2}  {:>7}",
                c.label, c.precision, c.recall, c.f1, c.support
            )?;
        }
        writeln!(
            f,
            "{:>width$}  {:>9}  {:>9}  {:>9.2}  {:>7}",
            "accuracy", "", "", self.accuracy, self.total
        )
    }
}

/// Classifies every sample and compares against its label.
pub fn evaluate(
    classifier: &ResumeClassifier,
    samples: &[TrainingSample],
) -> ClassifierResult<ClassificationReport> {
    let predictions = samples
        .iter()
        .map(|s| classifier.classify_text(&s.text).map(|c| c.category))
        .collect::<ClassifierResult<Vec<_>>>()?;

    Ok(ClassificationReport::from_pairs(
        samples
            .iter()
            .zip(&predictions)
            .map(|(s, p)| (s.category.as_str(), p.as_str())),
    ))
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
