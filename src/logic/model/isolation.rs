//! Isolation Forest Anomaly Detector
//!
//! One-class ensemble of random split trees trained on the scaled training
//! matrix. Outliers isolate in short paths; the score threshold is the
//! contamination quantile of the training scores.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Euler-Mascheroni constant, for the average path length correction
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

// ============================================================================
// PARAMETERS
// ============================================================================

#[derive(Debug, Clone)]
pub struct IsolationParams {
    pub n_trees: usize,
    /// Rows drawn per tree (capped at the training size)
    pub max_samples: usize,
    /// Fraction of training rows treated as outliers when thresholding
    pub contamination: f64,
    pub seed: u64,
}

impl Default for IsolationParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_samples: 256,
            contamination: 0.1,
            seed: 42,
        }
    }
}

// ============================================================================
// TREE
// ============================================================================

enum Node {
    Split {
        feature: usize,
        value: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

impl Node {
    fn build(data: &Array2<f64>, rows: Vec<usize>, depth: usize, limit: usize, rng: &mut StdRng) -> Node {
        if depth >= limit || rows.len() <= 1 {
            return Node::Leaf { size: rows.len() };
        }

        let n_features = data.ncols();
        let feature = rng.gen_range(0..n_features);

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &r in &rows {
            let v = data[[r, feature]];
            min = min.min(v);
            max = max.max(v);
        }
        if !(max > min) {
            return Node::Leaf { size: rows.len() };
        }

        let value = rng.gen_range(min..max);
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&r| data[[r, feature]] < value);

        Node::Split {
            feature,
            value,
            left: Box::new(Node::build(data, left_rows, depth + 1, limit, rng)),
            right: Box::new(Node::build(data, right_rows, depth + 1, limit, rng)),
        }
    }

    fn path_length(&self, row: &Array1<f64>, depth: f64) -> f64 {
        match self {
            Node::Leaf { size } => depth + average_path_length(*size),
            Node::Split { feature, value, left, right } => {
                let v = row.get(*feature).copied().unwrap_or(0.0);
                if v < *value {
                    left.path_length(row, depth + 1.0)
                } else {
                    right.path_length(row, depth + 1.0)
                }
            }
        }
    }
}

/// Expected path length of an unsuccessful BST search over `n` points
fn average_path_length(n: usize) -> f64 {
    if n <= 1 {
        return 0.0;
    }
    let n = n as f64;
    2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
}

// ============================================================================
// FOREST
// ============================================================================

/// Trained one-class detector
pub struct IsolationForest {
    trees: Vec<Node>,
    /// Normalization term c(max_samples)
    expected_depth: f64,
    /// Scores above this are outliers
    threshold: f64,
    params: IsolationParams,
}

impl IsolationForest {
    /// Fit the forest and derive the score threshold from the training set
    pub fn fit(data: &Array2<f64>, params: IsolationParams) -> Self {
        let n = data.nrows();
        if n == 0 {
            log::warn!("Isolation forest fitted on empty data, scoring disabled");
            return Self {
                trees: Vec::new(),
                expected_depth: 0.0,
                threshold: 0.5,
                params,
            };
        }
        let sample_size = params.max_samples.min(n).max(2);
        let depth_limit = (sample_size as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(params.seed);

        let mut trees = Vec::with_capacity(params.n_trees);
        for _ in 0..params.n_trees {
            let rows: Vec<usize> = (0..sample_size).map(|_| rng.gen_range(0..n)).collect();
            trees.push(Node::build(data, rows, 0, depth_limit, &mut rng));
        }

        let mut forest = Self {
            trees,
            expected_depth: average_path_length(sample_size),
            threshold: 0.5,
            params,
        };

        // threshold = contamination quantile of training scores
        let mut scores: Vec<f64> = (0..n)
            .map(|i| forest.score(&data.row(i).to_owned()))
            .collect();
        scores.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let cut = ((1.0 - forest.params.contamination) * (n as f64 - 1.0)).round() as usize;
        forest.threshold = scores.get(cut.min(n - 1)).copied().unwrap_or(0.5);

        log::info!(
            "Isolation forest fitted: {} trees, threshold {:.3}",
            forest.trees.len(),
            forest.threshold
        );

        forest
    }

    /// Anomaly score in (0,1); higher isolates faster
    pub fn score(&self, row: &Array1<f64>) -> f64 {
        if self.trees.is_empty() || self.expected_depth <= 0.0 {
            return 0.0;
        }
        let mean_path: f64 = self
            .trees
            .iter()
            .map(|t| t.path_length(row, 0.0))
            .sum::<f64>()
            / self.trees.len() as f64;

        2f64.powf(-mean_path / self.expected_depth)
    }

    /// True if the row scores past the training-derived threshold
    pub fn is_outlier(&self, row: &Array1<f64>) -> bool {
        self.score(row) > self.threshold
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn clustered_data() -> Array2<f64> {
        // tight cluster around (0.5, 0.5)
        let n = 200;
        let mut data = Array2::<f64>::zeros((n, 2));
        for i in 0..n {
            data[[i, 0]] = 0.45 + (i as f64 % 10.0) * 0.01;
            data[[i, 1]] = 0.45 + ((i / 10) as f64 % 10.0) * 0.01;
        }
        data
    }

    #[test]
    fn test_inlier_vs_outlier_scores() {
        let data = clustered_data();
        let forest = IsolationForest::fit(&data, IsolationParams::default());

        let inlier = Array1::from(vec![0.5, 0.5]);
        let outlier = Array1::from(vec![50.0, -50.0]);
        assert!(forest.score(&outlier) > forest.score(&inlier));
        assert!(forest.is_outlier(&outlier));
    }

    #[test]
    fn test_scores_in_unit_range() {
        let data = clustered_data();
        let forest = IsolationForest::fit(&data, IsolationParams::default());
        for point in [vec![0.5, 0.5], vec![10.0, 10.0], vec![-3.0, 0.2]] {
            let s = forest.score(&Array1::from(point));
            assert!((0.0..=1.0).contains(&s), "score {} out of range", s);
        }
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let data = clustered_data();
        let a = IsolationForest::fit(&data, IsolationParams::default());
        let b = IsolationForest::fit(&data, IsolationParams::default());
        let row = Array1::from(vec![0.7, 0.3]);
        assert_eq!(a.score(&row), b.score(&row));
        assert_eq!(a.threshold(), b.threshold());
    }

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(1), 0.0);
        // c(2) = 2*(ln(1) + gamma) - 2*1/2 ~ 0.1544
        assert!((average_path_length(2) - 0.1544).abs() < 1e-3);
        assert!(average_path_length(256) > average_path_length(16));
    }
}
