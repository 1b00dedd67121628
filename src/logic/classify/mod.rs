//! Behavior Classification
//!
//! - `rules` - override and anomaly policy thresholds
//! - `classifier` - model inference + deterministic post-processing

pub mod classifier;
pub mod rules;

pub use classifier::{BehaviorClassifier, Prediction};
pub use rules::{AnomalyRules, OverrideThresholds};
