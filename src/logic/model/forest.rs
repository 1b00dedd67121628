//! Boosted Tree Ensemble
//!
//! Multi-class boosted decision trees (SAMME-style, weighted resampling)
//! over `linfa_trees`. Regularized the way the production model was tuned:
//! shallow trees, shrinkage, row subsampling. Training is deterministic for
//! a fixed seed.

use std::collections::HashMap;

use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::logic::domains::CategoryLabel;

// ============================================================================
// LABEL ENCODER
// ============================================================================

/// Maps category labels <-> class indices for the ensemble.
/// Classes are sorted by name so the encoding is stable across runs.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<CategoryLabel>,
    index: HashMap<CategoryLabel, usize>,
}

impl LabelEncoder {
    /// Fit from observed labels
    pub fn fit(labels: &[CategoryLabel]) -> Self {
        let mut classes: Vec<CategoryLabel> = Vec::new();
        for &label in labels {
            if !classes.contains(&label) {
                classes.push(label);
            }
        }
        classes.sort_by_key(|c| c.as_str());

        let index = classes.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { classes, index }
    }

    pub fn encode(&self, label: CategoryLabel) -> Option<usize> {
        self.index.get(&label).copied()
    }

    pub fn decode(&self, idx: usize) -> Option<CategoryLabel> {
        self.classes.get(idx).copied()
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> &[CategoryLabel] {
        &self.classes
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// Boosting hyperparameters
#[derive(Debug, Clone)]
pub struct BoostParams {
    pub n_estimators: usize,
    /// Limited depth keeps individual trees weak
    pub max_depth: usize,
    /// Shrinkage applied to every stage weight
    pub learning_rate: f64,
    /// Fraction of rows drawn per stage
    pub subsample: f64,
    pub seed: u64,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 6,
            learning_rate: 0.1,
            subsample: 0.8,
            seed: 42,
        }
    }
}

// ============================================================================
// ENSEMBLE
// ============================================================================

#[derive(Debug)]
pub struct ModelError(pub String);

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ModelError: {}", self.0)
    }
}

impl std::error::Error for ModelError {}

/// Boosted ensemble of weighted decision trees
pub struct BoostedTrees {
    stages: Vec<(DecisionTree<f64, usize>, f64)>,
    n_classes: usize,
    params: BoostParams,
}

impl BoostedTrees {
    pub fn new(params: BoostParams) -> Self {
        Self {
            stages: Vec::new(),
            n_classes: 0,
            params,
        }
    }

    pub fn is_trained(&self) -> bool {
        !self.stages.is_empty()
    }

    pub fn n_stages(&self) -> usize {
        self.stages.len()
    }

    /// Fit the ensemble on encoded targets.
    ///
    /// Each stage draws a weighted bootstrap of the training rows, fits a
    /// shallow tree, and re-weights the rows it misclassified. Stage weight
    /// follows SAMME with the configured shrinkage.
    pub fn train(
        &mut self,
        features: &Array2<f64>,
        targets: &[usize],
        n_classes: usize,
    ) -> Result<(), ModelError> {
        let n_samples = features.nrows();
        if n_samples == 0 || n_samples != targets.len() {
            return Err(ModelError(format!(
                "feature/target shape mismatch: {} rows vs {} targets",
                n_samples,
                targets.len()
            )));
        }
        if n_classes < 2 {
            return Err(ModelError("need at least 2 classes to train".to_string()));
        }

        let n_features = features.ncols();
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let sample_size = ((n_samples as f64) * self.params.subsample).max(1.0) as usize;

        // chance level for K classes: a stage must beat 1 - 1/K
        let chance_error = 1.0 - 1.0 / n_classes as f64;

        let mut weights = vec![1.0 / n_samples as f64; n_samples];
        let mut stages: Vec<(DecisionTree<f64, usize>, f64)> = Vec::new();

        for stage in 0..self.params.n_estimators {
            let dist = WeightedIndex::new(&weights)
                .map_err(|e| ModelError(format!("sample weights degenerate: {}", e)))?;

            let boot_indices: Vec<usize> =
                (0..sample_size).map(|_| dist.sample(&mut rng)).collect();

            let boot_features = Array2::from_shape_fn((sample_size, n_features), |(r, c)| {
                features[[boot_indices[r], c]]
            });
            let boot_targets = Array1::from_shape_fn(sample_size, |r| targets[boot_indices[r]]);

            let dataset = DatasetBase::new(boot_features, boot_targets);
            let tree = match DecisionTree::params()
                .max_depth(Some(self.params.max_depth))
                .min_weight_split(4.0)
                .min_weight_leaf(2.0)
                .fit(&dataset)
            {
                Ok(tree) => tree,
                Err(e) => {
                    log::warn!("Stage {} failed to fit: {:?}", stage, e);
                    continue;
                }
            };

            // Weighted training error over the full set
            let predictions = tree.predict(features);
            let error: f64 = predictions
                .iter()
                .zip(targets.iter())
                .zip(weights.iter())
                .filter(|((pred, target), _)| pred != target)
                .map(|(_, &w)| w)
                .sum();
            let error = error.clamp(1e-10, 1.0);

            if error >= chance_error {
                log::debug!("Stage {} no better than chance ({:.3}), skipped", stage, error);
                continue;
            }

            let alpha = self.params.learning_rate
                * (((1.0 - error) / error).ln() + (n_classes as f64 - 1.0).ln());
            if alpha <= 0.0 {
                continue;
            }

            // Up-weight the rows this stage got wrong
            for ((pred, &target), w) in
                predictions.iter().zip(targets.iter()).zip(weights.iter_mut())
            {
                if *pred != target {
                    *w *= alpha.exp();
                }
            }
            let total: f64 = weights.iter().sum();
            for w in weights.iter_mut() {
                *w /= total;
            }

            stages.push((tree, alpha));
        }

        if stages.is_empty() {
            return Err(ModelError("all boosting stages failed".to_string()));
        }

        log::info!("Boosted ensemble trained: {} stages, {} classes", stages.len(), n_classes);

        self.stages = stages;
        self.n_classes = n_classes;
        Ok(())
    }

    /// Class probability distribution (normalized stage-weighted votes)
    pub fn predict_proba(&self, row: &Array1<f64>) -> Vec<f64> {
        if self.stages.is_empty() || self.n_classes == 0 {
            return Vec::new();
        }

        let input = row.clone().insert_axis(Axis(0));
        let mut scores = vec![0.0; self.n_classes];

        for (tree, alpha) in &self.stages {
            let pred = tree.predict(&input);
            if let Some(&class) = pred.first() {
                if class < self.n_classes {
                    scores[class] += alpha;
                }
            }
        }

        let total: f64 = scores.iter().sum();
        if total > 0.0 {
            for s in scores.iter_mut() {
                *s /= total;
            }
        } else {
            let uniform = 1.0 / self.n_classes as f64;
            scores.iter_mut().for_each(|s| *s = uniform);
        }

        scores
    }

    /// Predicted class index with its probability
    pub fn predict(&self, row: &Array1<f64>) -> Option<(usize, f64)> {
        let proba = self.predict_proba(row);
        proba
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(idx, &p)| (idx, p))
    }
}

// ============================================================================
// TESTS
// ============================================================================
