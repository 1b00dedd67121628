//! Analyzer Configuration
//!
//! Everything tunable is injected here at construction time. The crate has
//! no ambient process-wide settings; log output goes through the `log`
//! facade and is configured by the embedding binary.

use serde::{Deserialize, Serialize};

use crate::logic::classify::{AnomalyRules, OverrideThresholds};

/// Default analysis window in minutes
pub const DEFAULT_WINDOW_MINUTES: u32 = 30;

/// Default key for the anonymization hash. Deployments that need ids
/// unlinkable across installations override this.
pub const DEFAULT_ANONYMIZE_KEY: &str = "insightnet";

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Nominal analysis window passed to the extractor
    pub window_minutes: u32,
    /// Key for the stable anonymized user id
    pub anonymize_key: String,
    /// Exclude SDK/infra chatter from category percentages
    pub infra_filter: bool,
    /// Post-model override policy
    pub overrides: OverrideThresholds,
    /// Rule-based anomaly policy
    pub anomaly_rules: AnomalyRules,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            window_minutes: DEFAULT_WINDOW_MINUTES,
            anonymize_key: DEFAULT_ANONYMIZE_KEY.to_string(),
            infra_filter: true,
            overrides: OverrideThresholds::default(),
            anomaly_rules: AnomalyRules::default(),
        }
    }
}
