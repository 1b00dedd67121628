//! Model Training
//!
//! Loads labeled feature datasets, fills columns older data is missing,
//! runs a stratified train/validation/test split, and fits the full
//! artifact: scaler, label encoder, boosted ensemble, anomaly detector.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::logic::domains::CategoryLabel;
use crate::logic::features::layout::{FEATURE_COUNT, FEATURE_LAYOUT};

use super::forest::{BoostParams, BoostedTrees, LabelEncoder};
use super::isolation::{IsolationForest, IsolationParams};
use super::scaler::StandardScaler;

/// Fewest samples worth fitting on
pub const MIN_TRAINING_SAMPLES: usize = 50;

/// Train / validation / test fractions
const SPLIT_FRACTIONS: (f64, f64) = (0.6, 0.2);

/// Overfitting gap that triggers a warning
const OVERFIT_WARN_GAP: f64 = 0.1;

// ============================================================================
// ERROR
// ============================================================================

#[derive(Debug)]
pub struct TrainingError(pub String);

impl std::fmt::Display for TrainingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TrainingError: {}", self.0)
    }
}

impl std::error::Error for TrainingError {}

// ============================================================================
// TRAINING SAMPLE
// ============================================================================

/// One labeled row of the training file. Fields may be a subset of the
/// current layout; `to_row` backfills what is missing.
#[derive(Debug, Clone)]
pub struct TrainingSample {
    pub label: CategoryLabel,
    pub fields: HashMap<String, f64>,
}

impl TrainingSample {
    fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    /// Materialize the sample in layout order, backfilling absent columns
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        let mut row = [0.0; FEATURE_COUNT];
        for (i, &name) in FEATURE_LAYOUT.iter().enumerate() {
            row[i] = self.get(name).unwrap_or_else(|| self.backfill(name));
        }
        row
    }

    /// Plausible value for a column the sample predates, derived from
    /// correlated columns. A one-time compatibility shim for v1 datasets,
    /// not a data-augmentation mechanism.
    fn backfill(&self, name: &str) -> f64 {
        let entertainment = self.get("entertainment_pct").unwrap_or(0.0);
        let work = self.get("work_pct").unwrap_or(0.0);
        let total = self.get("total_queries").unwrap_or(0.0);

        match name {
            "shopping_pct" => 0.3 * work,
            "pure_entertainment_pct" => 0.8 * entertainment,
            "entertainment_tracking_pct" => 0.2 * entertainment,
            "social_media_pct" => 0.5 * entertainment,
            "streaming_pct" => 0.4 * entertainment,
            "dev_tools_pct" => 0.5 * work,
            "cloud_services_pct" => 0.3 * work,
            "unique_domains" => 0.5 * total,
            "top_domain_concentration" => 0.2,
            "category_diversity" => 3.0,
            "session_duration" => 30.0,
            "peak_activity_hour" => 12.0,
            "weekend_activity" => 0.5,
            "avg_query_length" => 15.0,
            "query_length_variance" => 20.0,
            _ => 0.0,
        }
    }
}

/// Load a training file: a JSON array of objects carrying the feature
/// fields plus a `label`. Malformed data is fatal to training only.
pub fn load_training_file(path: &Path) -> Result<Vec<TrainingSample>, TrainingError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| TrainingError(format!("read {}: {}", path.display(), e)))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| TrainingError(format!("parse {}: {}", path.display(), e)))?;

    let array = value
        .as_array()
        .ok_or_else(|| TrainingError("training file must be a JSON array".to_string()))?;

    let mut samples = Vec::with_capacity(array.len());
    for (i, item) in array.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| TrainingError(format!("sample {} is not an object", i)))?;

        let label_str = obj
            .get("label")
            .and_then(|v| v.as_str())
            .ok_or_else(|| TrainingError(format!("sample {} has no label", i)))?;
        let label = CategoryLabel::parse(label_str)
            .ok_or_else(|| TrainingError(format!("sample {}: unknown label '{}'", i, label_str)))?;

        let fields = obj
            .iter()
            .filter(|(k, _)| k.as_str() != "label")
            .filter_map(|(k, v)| v.as_f64().map(|f| (k.clone(), f)))
            .collect();

        samples.push(TrainingSample { label, fields });
    }

    log::info!("Loaded {} training samples from {}", samples.len(), path.display());
    Ok(samples)
}

// ============================================================================
// SYNTHETIC TRAINING DATA
// ============================================================================

struct ClassPattern {
    label: CategoryLabel,
    count: usize,
    entertainment: (f64, f64),
    work: (f64, f64),
    unethical: (f64, f64),
    shopping: (f64, f64),
    queries_per_minute: (f64, f64),
    entropy: (f64, f64),
}

const CLASS_PATTERNS: &[ClassPattern] = &[
    ClassPattern {
        label: CategoryLabel::Entertainment,
        count: 200,
        entertainment: (0.6, 0.9),
        work: (0.0, 0.2),
        unethical: (0.0, 0.1),
        shopping: (0.0, 0.1),
        queries_per_minute: (8.0, 15.0),
        entropy: (2.0, 4.0),
    },
    ClassPattern {
        label: CategoryLabel::Work,
        count: 250,
        entertainment: (0.0, 0.2),
        work: (0.6, 0.9),
        unethical: (0.0, 0.1),
        shopping: (0.0, 0.1),
        queries_per_minute: (5.0, 12.0),
        entropy: (1.5, 3.5),
    },
    ClassPattern {
        label: CategoryLabel::Unethical,
        count: 150,
        entertainment: (0.0, 0.3),
        work: (0.0, 0.4),
        unethical: (0.2, 0.8),
        shopping: (0.0, 0.1),
        queries_per_minute: (3.0, 8.0),
        entropy: (1.0, 3.0),
    },
    ClassPattern {
        label: CategoryLabel::Shopping,
        count: 200,
        entertainment: (0.1, 0.3),
        work: (0.0, 0.2),
        unethical: (0.0, 0.1),
        shopping: (0.4, 0.8),
        queries_per_minute: (4.0, 10.0),
        entropy: (2.0, 4.0),
    },
    ClassPattern {
        label: CategoryLabel::Neutral,
        count: 200,
        entertainment: (0.1, 0.4),
        work: (0.1, 0.4),
        unethical: (0.0, 0.1),
        shopping: (0.0, 0.1),
        queries_per_minute: (2.0, 8.0),
        entropy: (1.0, 2.5),
    },
];

/// Generate labeled samples from closed-form class ranges. Used when no
/// training file exists and by tests. Deterministic for a fixed seed.
pub fn generate_default_samples(seed: u64) -> Vec<TrainingSample> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::new();

    for pattern in CLASS_PATTERNS {
        for _ in 0..pattern.count {
            let mut ent = rng.gen_range(pattern.entertainment.0..=pattern.entertainment.1);
            let mut work = rng.gen_range(pattern.work.0..=pattern.work.1);
            let mut uneth = rng.gen_range(pattern.unethical.0..=pattern.unethical.1);
            let mut shop = rng.gen_range(pattern.shopping.0..=pattern.shopping.1);

            let sum = ent + work + uneth + shop;
            if sum > 1.0 {
                ent /= sum;
                work /= sum;
                uneth /= sum;
                shop /= sum;
            }
            let neutral = (1.0 - (ent + work + uneth + shop)).max(0.0);

            let qpm = rng.gen_range(pattern.queries_per_minute.0..=pattern.queries_per_minute.1);
            let entropy = rng.gen_range(pattern.entropy.0..=pattern.entropy.1);
            let session = rng.gen_range(10.0..=60.0);
            let total = (qpm * rng.gen_range(15.0..=45.0)).round();
            let unique = (total * rng.gen_range(0.3..=0.8)).round();

            let mut fields = HashMap::new();
            fields.insert("total_queries".to_string(), total);
            fields.insert("unique_domains".to_string(), unique);
            fields.insert("entertainment_pct".to_string(), ent);
            fields.insert("work_pct".to_string(), work);
            fields.insert("unethical_pct".to_string(), uneth);
            fields.insert("neutral_pct".to_string(), neutral);
            fields.insert("shopping_pct".to_string(), shop);
            fields.insert("session_duration".to_string(), session);
            fields.insert("queries_per_minute".to_string(), qpm);
            fields.insert("domain_entropy".to_string(), entropy);
            fields.insert(
                "top_domain_concentration".to_string(),
                rng.gen_range(0.1..=0.5),
            );
            fields.insert("blocked_queries_pct".to_string(), rng.gen_range(0.0..=0.05));
            fields.insert("category_diversity".to_string(), rng.gen_range(2.0..=5.0_f64).round());
            fields.insert("peak_activity_hour".to_string(), rng.gen_range(8.0..=20.0_f64).round());
            fields.insert("weekend_activity".to_string(), rng.gen_range(0.0..=0.6));
            fields.insert("avg_query_length".to_string(), rng.gen_range(8.0..=25.0));
            fields.insert("query_length_variance".to_string(), rng.gen_range(5.0..=40.0));
            fields.insert("social_media_pct".to_string(), ent * rng.gen_range(0.3..=0.7));
            fields.insert("streaming_pct".to_string(), ent * rng.gen_range(0.2..=0.6));
            fields.insert("dev_tools_pct".to_string(), work * rng.gen_range(0.3..=0.7));
            fields.insert("cloud_services_pct".to_string(), work * rng.gen_range(0.1..=0.5));
            fields.insert("pure_entertainment_pct".to_string(), ent * rng.gen_range(0.7..=0.95));
            fields.insert("entertainment_tracking_pct".to_string(), ent * rng.gen_range(0.05..=0.3));

            samples.push(TrainingSample { label: pattern.label, fields });
        }
    }

    samples
}

// ============================================================================
// STRATIFIED SPLIT
// ============================================================================

/// Shuffle within each class, then cut 60/20/20
fn stratified_split(samples: &[TrainingSample], seed: u64) -> (Vec<usize>, Vec<usize>, Vec<usize>) {
    let mut by_class: HashMap<CategoryLabel, Vec<usize>> = HashMap::new();
    for (i, s) in samples.iter().enumerate() {
        by_class.entry(s.label).or_default().push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut valid = Vec::new();
    let mut test = Vec::new();

    // iterate classes in stable order
    let mut classes: Vec<CategoryLabel> = by_class.keys().copied().collect();
    classes.sort_by_key(|c| c.as_str());

    for class in classes {
        let mut indices = by_class.remove(&class).unwrap_or_default();
        indices.shuffle(&mut rng);

        let n = indices.len();
        let n_train = ((n as f64) * SPLIT_FRACTIONS.0).round() as usize;
        let n_valid = ((n as f64) * SPLIT_FRACTIONS.1).round() as usize;

        train.extend_from_slice(&indices[..n_train.min(n)]);
        valid.extend_from_slice(&indices[n_train.min(n)..(n_train + n_valid).min(n)]);
        test.extend_from_slice(&indices[(n_train + n_valid).min(n)..]);
    }

    (train, valid, test)
}

// ============================================================================
// ARTIFACT
// ============================================================================

/// Accuracy summary from the held-out evaluation
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub train_accuracy: f64,
    pub validation_accuracy: f64,
    pub test_accuracy: f64,
    /// train - validation accuracy; the generalization diagnostic
    pub overfitting_gap: f64,
    pub n_train: usize,
    pub n_validation: usize,
    pub n_test: usize,
}

/// Everything inference needs, fitted together and immutable afterwards
pub struct TrainedArtifact {
    pub scaler: StandardScaler,
    pub encoder: LabelEncoder,
    pub model: BoostedTrees,
    pub detector: IsolationForest,
    /// Layout the artifact was trained with
    pub feature_names: Vec<String>,
    pub trained_at: DateTime<Utc>,
    pub report: ValidationReport,
}

/// Fit the complete artifact with a stratified 60/20/20 evaluation
pub fn train_with_validation(
    samples: &[TrainingSample],
    boost: BoostParams,
    isolation: IsolationParams,
) -> Result<TrainedArtifact, TrainingError> {
    if samples.len() < MIN_TRAINING_SAMPLES {
        return Err(TrainingError(format!(
            "need at least {} samples, got {}",
            MIN_TRAINING_SAMPLES,
            samples.len()
        )));
    }

    let labels: Vec<CategoryLabel> = samples.iter().map(|s| s.label).collect();
    let encoder = LabelEncoder::fit(&labels);
    if encoder.num_classes() < 2 {
        return Err(TrainingError("need at least 2 classes".to_string()));
    }

    let (train_idx, valid_idx, test_idx) = stratified_split(samples, boost.seed);
    if train_idx.is_empty() || valid_idx.is_empty() {
        return Err(TrainingError("split produced an empty partition".to_string()));
    }

    let matrix = |indices: &[usize]| -> Array2<f64> {
        let mut m = Array2::<f64>::zeros((indices.len(), FEATURE_COUNT));
        for (r, &i) in indices.iter().enumerate() {
            let row = samples[i].to_row();
            for (c, v) in row.iter().enumerate() {
                m[[r, c]] = *v;
            }
        }
        m
    };
    let targets = |indices: &[usize]| -> Vec<usize> {
        indices
            .iter()
            .filter_map(|&i| encoder.encode(samples[i].label))
            .collect()
    };

    let train_raw = matrix(&train_idx);
    let scaler = StandardScaler::fit(&train_raw);
    let train_scaled = scaler.transform(&train_raw);
    let valid_scaled = scaler.transform(&matrix(&valid_idx));
    let test_scaled = scaler.transform(&matrix(&test_idx));

    let train_targets = targets(&train_idx);
    let valid_targets = targets(&valid_idx);
    let test_targets = targets(&test_idx);

    let mut model = BoostedTrees::new(boost);
    model
        .train(&train_scaled, &train_targets, encoder.num_classes())
        .map_err(|e| TrainingError(format!("ensemble training failed: {}", e)))?;

    let accuracy = |data: &Array2<f64>, expected: &[usize]| -> f64 {
        if expected.is_empty() {
            return 0.0;
        }
        let correct = (0..data.nrows())
            .filter(|&r| {
                model
                    .predict(&data.row(r).to_owned())
                    .map(|(class, _)| class == expected[r])
                    .unwrap_or(false)
            })
            .count();
        correct as f64 / expected.len() as f64
    };

    let train_accuracy = accuracy(&train_scaled, &train_targets);
    let validation_accuracy = accuracy(&valid_scaled, &valid_targets);
    let test_accuracy = accuracy(&test_scaled, &test_targets);
    let overfitting_gap = train_accuracy - validation_accuracy;

    log::info!(
        "Training accuracy {:.3}, validation {:.3}, test {:.3} (gap {:.3})",
        train_accuracy,
        validation_accuracy,
        test_accuracy,
        overfitting_gap
    );
    if overfitting_gap > OVERFIT_WARN_GAP {
        log::warn!("Overfitting gap {:.3} exceeds {:.2}", overfitting_gap, OVERFIT_WARN_GAP);
    }

    let detector = IsolationForest::fit(&train_scaled, isolation);

    Ok(TrainedArtifact {
        scaler,
        encoder,
        model,
        detector,
        feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        trained_at: Utc::now(),
        report: ValidationReport {
            train_accuracy,
            validation_accuracy,
            test_accuracy,
            overfitting_gap,
            n_train: train_idx.len(),
            n_validation: valid_idx.len(),
            n_test: test_idx.len(),
        },
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_generate_default_samples() {
        let samples = generate_default_samples(42);
        assert_eq!(samples.len(), 1000);

        // every class represented
        for label in crate::logic::domains::ALL_LABELS {
            assert!(samples.iter().any(|s| s.label == label));
        }

        // percentages stay in range and sum to <= 1 before neutral fill
        for s in samples.iter().take(50) {
            let row = s.to_row();
            let sum: f64 = row[2..7].iter().sum();
            assert!((sum - 1.0).abs() < 1e-6, "category sum {}", sum);
        }
    }

    #[test]
    fn test_generation_deterministic() {
        let a = generate_default_samples(7);
        let b = generate_default_samples(7);
        assert_eq!(a[0].to_row(), b[0].to_row());
        assert_eq!(a[999].to_row(), b[999].to_row());
    }

    #[test]
    fn test_backfill_derives_from_correlates() {
        let mut fields = HashMap::new();
        fields.insert("work_pct".to_string(), 0.6);
        fields.insert("entertainment_pct".to_string(), 0.2);
        let sample = TrainingSample { label: CategoryLabel::Work, fields };

        let row = sample.to_row();
        let idx = crate::logic::features::feature_index("shopping_pct").unwrap();
        assert!((row[idx] - 0.18).abs() < 1e-9);
        let idx = crate::logic::features::feature_index("pure_entertainment_pct").unwrap();
        assert!((row[idx] - 0.16).abs() < 1e-9);
        let idx = crate::logic::features::feature_index("peak_activity_hour").unwrap();
        assert_eq!(row[idx], 12.0);
    }

    #[test]
    fn test_stratified_split_partitions() {
        let samples = generate_default_samples(42);
        let (train, valid, test) = stratified_split(&samples, 42);

        assert_eq!(train.len() + valid.len() + test.len(), samples.len());

        // roughly 60/20/20
        assert!((train.len() as f64 / samples.len() as f64 - 0.6).abs() < 0.05);
        assert!((valid.len() as f64 / samples.len() as f64 - 0.2).abs() < 0.05);

        // no overlap
        let mut all: Vec<usize> = train.iter().chain(&valid).chain(&test).copied().collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), samples.len());
    }

    #[test]
    fn test_train_with_validation() {
        let samples = generate_default_samples(42);
        let artifact = train_with_validation(
            &samples,
            BoostParams { n_estimators: 30, ..Default::default() },
            IsolationParams { n_trees: 50, ..Default::default() },
        )
        .unwrap();

        assert_eq!(artifact.encoder.num_classes(), 5);
        assert!(artifact.model.is_trained());
        // the synthetic classes are well separated
        assert!(artifact.report.validation_accuracy > 0.6);
        assert!(artifact.report.train_accuracy <= 1.0);
        assert_eq!(artifact.feature_names.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_too_few_samples_is_error() {
        let samples = generate_default_samples(42)
            .into_iter()
            .take(10)
            .collect::<Vec<_>>();
        assert!(train_with_validation(
            &samples,
            BoostParams::default(),
            IsolationParams::default()
        )
        .is_err());
    }

    #[test]
    fn test_load_training_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"[{{"label": "work", "work_pct": 0.8, "total_queries": 120}},
                {{"label": "entertainment", "entertainment_pct": 0.9}}]"#
        )
        .unwrap();

        let samples = load_training_file(f.path()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label, CategoryLabel::Work);
        assert_eq!(samples[0].fields.get("work_pct"), Some(&0.8));
    }

    #[test]
    fn test_load_training_file_rejects_bad_label() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"[{{"label": "bogus", "work_pct": 0.8}}]"#).unwrap();
        assert!(load_training_file(f.path()).is_err());
    }
}
