//! Analysis Orchestrator
//!
//! Composes extraction, classification and anonymization into one
//! `analyze` call and keeps the in-memory result history.

use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use crate::logic::classify::BehaviorClassifier;
use crate::logic::config::AnalyzerConfig;
use crate::logic::domains::{CategoryLabel, DomainCategoryStore, DomainContextResolver};
use crate::logic::features::{FeatureExtractor, FeatureVector};
use crate::logic::identity;
use crate::logic::logs::LogEntry;
use crate::logic::model::{
    generate_default_samples, load_training_file, TrainingError, TrainingSample, ValidationReport,
};

/// Domains mentioned in the summary line
const SUMMARY_TOP_DOMAINS: usize = 3;

// ============================================================================
// RESULT
// ============================================================================

/// One completed analysis
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// When the analysis ran (RFC 3339)
    pub timestamp: String,
    /// Anonymized client id, 8 hex chars
    pub user_id: String,
    pub behavior: CategoryLabel,
    pub confidence: f64,
    pub is_anomaly: bool,
    pub features: FeatureVector,
    pub summary: String,
}

// ============================================================================
// ORCHESTRATOR
// ============================================================================

/// Full analysis pipeline over one classifier instance
pub struct BehaviorAnalyzer {
    extractor: FeatureExtractor,
    classifier: BehaviorClassifier,
    config: AnalyzerConfig,
    history: Vec<AnalysisResult>,
}

impl BehaviorAnalyzer {
    /// Build the pipeline from a category store and explicit config
    pub fn new(store: DomainCategoryStore, config: AnalyzerConfig) -> Self {
        let resolver = DomainContextResolver::new(store);
        let extractor = FeatureExtractor::new(resolver).with_infra_filter(config.infra_filter);
        let classifier = BehaviorClassifier::with_rules(
            config.overrides.clone(),
            config.anomaly_rules.clone(),
        );

        Self {
            extractor,
            classifier,
            config,
            history: Vec::new(),
        }
    }

    /// Default store and config
    pub fn with_defaults() -> Self {
        Self::new(DomainCategoryStore::with_defaults(), AnalyzerConfig::default())
    }

    pub fn classifier(&self) -> &BehaviorClassifier {
        &self.classifier
    }

    pub fn extractor(&self) -> &FeatureExtractor {
        &self.extractor
    }

    /// Train from a labeled dataset
    pub fn train(&self, samples: &[TrainingSample]) -> Result<ValidationReport, TrainingError> {
        self.classifier.train_with_validation(samples)
    }

    /// Train from a training file, generating the synthetic default dataset
    /// when the file is missing or unreadable
    pub fn train_from_file(&self, path: &Path) -> Result<ValidationReport, TrainingError> {
        let samples = match load_training_file(path) {
            Ok(samples) => samples,
            Err(e) => {
                log::warn!("{} - generating default training data", e);
                generate_default_samples(42)
            }
        };
        self.train(&samples)
    }

    /// Analyze one log batch: extract features, classify, anonymize,
    /// summarize, record.
    pub fn analyze(&mut self, logs: &[LogEntry]) -> AnalysisResult {
        let features = self.extractor.extract(logs, self.config.window_minutes);
        let prediction = self.classifier.predict(&features);
        let user_id = identity::anonymize_user(&self.config.anonymize_key, logs);
        let summary = summarize(&features, prediction.behavior, prediction.confidence);

        log::info!(
            "User {}: {} ({:.1}% confidence{})",
            user_id,
            prediction.behavior,
            prediction.confidence * 100.0,
            if prediction.is_anomaly { ", anomaly" } else { "" }
        );

        let result = AnalysisResult {
            timestamp: Utc::now().to_rfc3339(),
            user_id,
            behavior: prediction.behavior,
            confidence: prediction.confidence,
            is_anomaly: prediction.is_anomaly,
            features,
            summary,
        };

        self.history.push(result.clone());
        result
    }

    /// All results from this process lifetime, oldest first
    pub fn history(&self) -> &[AnalysisResult] {
        &self.history
    }

    /// Serialize the history to a JSON file
    pub fn save_results(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.history)?;
        std::fs::write(path, json)?;
        log::info!("Saved {} results to {}", self.history.len(), path.display());
        Ok(())
    }
}

/// Human-readable one-liner referencing the most queried domains
fn summarize(features: &FeatureVector, behavior: CategoryLabel, confidence: f64) -> String {
    let mut summary = format!(
        "User behavior classified as '{}' with {:.1}% confidence",
        behavior,
        confidence * 100.0
    );

    let top: Vec<String> = features
        .top_domains
        .iter()
        .take(SUMMARY_TOP_DOMAINS)
        .map(|(domain, count)| format!("{} ({} queries)", domain, count))
        .collect();
    if !top.is_empty() {
        summary.push_str(&format!(" - Top domains: {}", top.join(", ")));
    }

    summary
}

// ============================================================================
// TESTS
// ============================================================================
