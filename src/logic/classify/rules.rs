//! Classification Rules & Thresholds
//!
//! Policy constants for the post-model overrides and the rule-based anomaly
//! check. No classify logic here - constants and config only.
//!
//! The values are hand-tuned operating policy carried over from production;
//! they are surfaced as configuration rather than buried in the code.

use serde::{Deserialize, Serialize};

// ============================================================================
// OVERRIDE THRESHOLDS
// ============================================================================

/// Entertainment wins outright above this share (if it beats work and
/// unethical)
pub const ENTERTAINMENT_OVERRIDE_MIN: f64 = 0.35;

/// Work wins above this share (if it beats entertainment)
pub const WORK_OVERRIDE_MIN: f64 = 0.40;

/// Unethical wins above this share
pub const UNETHICAL_OVERRIDE_MIN: f64 = 0.20;

/// A sufficiently dominant category beats the model's raw prediction.
/// Applied after inference, in fixed priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideThresholds {
    pub entertainment_min: f64,
    pub work_min: f64,
    pub unethical_min: f64,
}

impl Default for OverrideThresholds {
    fn default() -> Self {
        Self {
            entertainment_min: ENTERTAINMENT_OVERRIDE_MIN,
            work_min: WORK_OVERRIDE_MIN,
            unethical_min: UNETHICAL_OVERRIDE_MIN,
        }
    }
}

// ============================================================================
// ANOMALY RULES
// ============================================================================

/// Entertainment share flagged as extreme
pub const ANOMALY_ENTERTAINMENT_MIN: f64 = 0.8;

/// Unethical share flagged as extreme
pub const ANOMALY_UNETHICAL_MIN: f64 = 0.3;

/// Query rate (per minute) flagged as bot-like
pub const ANOMALY_QUERY_RATE_MIN: f64 = 30.0;

/// Entropy below this at volume means repetitive, scripted lookups
pub const ANOMALY_LOW_ENTROPY_MAX: f64 = 1.0;

/// Query volume above which low entropy counts
pub const ANOMALY_LOW_ENTROPY_QUERIES: f64 = 100.0;

/// Peak activity outside [start, end] hours is off-hours
pub const ANOMALY_ACTIVE_HOURS: (f64, f64) = (6.0, 23.0);

/// Known-bad patterns the statistical detector may normalize away.
/// Any single hit flags the window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnomalyRules {
    pub entertainment_min: f64,
    pub unethical_min: f64,
    pub query_rate_min: f64,
    pub low_entropy_max: f64,
    pub low_entropy_queries: f64,
    pub active_hours: (f64, f64),
}

impl Default for AnomalyRules {
    fn default() -> Self {
        Self {
            entertainment_min: ANOMALY_ENTERTAINMENT_MIN,
            unethical_min: ANOMALY_UNETHICAL_MIN,
            query_rate_min: ANOMALY_QUERY_RATE_MIN,
            low_entropy_max: ANOMALY_LOW_ENTROPY_MAX,
            low_entropy_queries: ANOMALY_LOW_ENTROPY_QUERIES,
            active_hours: ANOMALY_ACTIVE_HOURS,
        }
    }
}
