//! Behavior Classifier
//!
//! Wraps the trained artifact and turns a feature vector into
//! (behavior, confidence, anomaly flag). Deterministic override rules run
//! after model inference; anomaly detection is the OR of the statistical
//! detector and the rule-based check.

use parking_lot::RwLock;
use serde::Serialize;

use crate::logic::domains::CategoryLabel;
use crate::logic::features::FeatureVector;
use crate::logic::model::{
    train_with_validation, BoostParams, IsolationParams, TrainedArtifact, TrainingError,
    TrainingSample, ValidationReport,
};

use super::rules::{AnomalyRules, OverrideThresholds};

// ============================================================================
// PREDICTION
// ============================================================================

/// Classification output for one analysis window
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub behavior: CategoryLabel,
    /// Max class probability, 0.0 when the model is not ready
    pub confidence: f64,
    pub is_anomaly: bool,
}

impl Prediction {
    /// Degenerate result returned before training/loading. Callers that
    /// must distinguish "genuinely neutral" check for confidence 0.
    fn not_ready() -> Self {
        Self {
            behavior: CategoryLabel::Neutral,
            confidence: 0.0,
            is_anomaly: false,
        }
    }
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Supervised classifier plus dual anomaly detection.
///
/// The artifact is installed once (train or load) and only read afterwards;
/// concurrent predictions share it without further locking concerns.
pub struct BehaviorClassifier {
    artifact: RwLock<Option<TrainedArtifact>>,
    overrides: OverrideThresholds,
    anomaly_rules: AnomalyRules,
    boost: BoostParams,
    isolation: IsolationParams,
}

impl BehaviorClassifier {
    pub fn new() -> Self {
        Self::with_rules(OverrideThresholds::default(), AnomalyRules::default())
    }

    /// Construct with explicit policy thresholds
    pub fn with_rules(overrides: OverrideThresholds, anomaly_rules: AnomalyRules) -> Self {
        Self {
            artifact: RwLock::new(None),
            overrides,
            anomaly_rules,
            boost: BoostParams::default(),
            isolation: IsolationParams::default(),
        }
    }

    pub fn is_trained(&self) -> bool {
        self.artifact.read().is_some()
    }

    /// Fit the artifact from labeled samples and install it.
    /// One-way transition; the installed artifact is never refit in place.
    pub fn train_with_validation(
        &self,
        samples: &[TrainingSample],
    ) -> Result<ValidationReport, TrainingError> {
        let artifact = train_with_validation(samples, self.boost.clone(), self.isolation.clone())?;
        let report = artifact.report.clone();
        *self.artifact.write() = Some(artifact);
        log::info!(
            "Classifier trained: validation accuracy {:.3}, gap {:.3}",
            report.validation_accuracy,
            report.overfitting_gap
        );
        Ok(report)
    }

    /// Install a previously fitted artifact
    pub fn load_artifact(&self, artifact: TrainedArtifact) {
        log::info!(
            "Installing artifact trained at {} ({} classes)",
            artifact.trained_at,
            artifact.encoder.num_classes()
        );
        *self.artifact.write() = Some(artifact);
    }

    /// Classify one feature vector.
    ///
    /// Returns the safe neutral default when no artifact is installed -
    /// a misconfiguration signal, not a normal negative result.
    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        let guard = self.artifact.read();
        let artifact = match guard.as_ref() {
            Some(a) => a,
            None => {
                log::error!("predict() called before train/load - returning neutral default");
                return Prediction::not_ready();
            }
        };

        // an empty window is neutral by definition, the model never runs
        if features.total_queries() <= 0.0 {
            return Prediction {
                behavior: CategoryLabel::Neutral,
                confidence: 0.0,
                is_anomaly: false,
            };
        }

        // Ordered row from the artifact's own feature list; names this
        // vector lacks read as 0 for older layouts
        let row: Vec<f64> = artifact
            .feature_names
            .iter()
            .map(|name| features.get_by_name(name))
            .collect();
        let scaled = artifact.scaler.transform_row(&row);

        let (behavior, confidence) = match artifact.model.predict(&scaled) {
            Some((class, confidence)) => (
                artifact.encoder.decode(class).unwrap_or(CategoryLabel::Neutral),
                confidence,
            ),
            None => (CategoryLabel::Neutral, 0.0),
        };

        let behavior = self.apply_overrides(features, behavior);

        let statistical = artifact.detector.is_outlier(&scaled);
        let indicators = self.rule_indicators(features);
        if !indicators.is_empty() {
            log::debug!("Rule-based anomaly indicators: {}", indicators.join("; "));
        }

        Prediction {
            behavior,
            confidence,
            is_anomaly: statistical || !indicators.is_empty(),
        }
    }

    /// Deterministic post-model overrides, in fixed priority order
    fn apply_overrides(&self, features: &FeatureVector, model_choice: CategoryLabel) -> CategoryLabel {
        let entertainment = features.entertainment_pct();
        let work = features.work_pct();
        let unethical = features.unethical_pct();

        let forced = if entertainment > self.overrides.entertainment_min
            && entertainment > work
            && entertainment > unethical
        {
            Some(CategoryLabel::Entertainment)
        } else if work > self.overrides.work_min && work > entertainment {
            Some(CategoryLabel::Work)
        } else if unethical > self.overrides.unethical_min {
            Some(CategoryLabel::Unethical)
        } else {
            None
        };

        match forced {
            Some(label) if label != model_choice => {
                log::debug!(
                    "Override: {} -> {} (ent {:.2}, work {:.2}, uneth {:.2})",
                    model_choice,
                    label,
                    entertainment,
                    work,
                    unethical
                );
                label
            }
            Some(label) => label,
            None => model_choice,
        }
    }

    /// Known-bad pattern checks; any hit flags the window
    fn rule_indicators(&self, features: &FeatureVector) -> Vec<&'static str> {
        let rules = &self.anomaly_rules;
        let mut indicators = Vec::new();

        if features.entertainment_pct() > rules.entertainment_min {
            indicators.push("very high entertainment share");
        }
        if features.unethical_pct() > rules.unethical_min {
            indicators.push("high unethical share");
        }
        if features.queries_per_minute() > rules.query_rate_min {
            indicators.push("unusually high query rate");
        }
        if features.domain_entropy() < rules.low_entropy_max
            && features.total_queries() > rules.low_entropy_queries
        {
            indicators.push("very low domain diversity at volume");
        }
        let peak = features.peak_activity_hour();
        if peak < rules.active_hours.0 || peak > rules.active_hours.1 {
            indicators.push("off-hours peak activity");
        }

        indicators
    }
}

impl Default for BehaviorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
