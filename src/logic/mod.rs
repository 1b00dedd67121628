//! Logic Module - Analysis Engines
//!
//! - `logs` - input records and accepted shapes
//! - `domains` - categorization and tracking attribution
//! - `features` - feature engineering
//! - `model` - trained artifact (scaler, ensemble, anomaly detector)
//! - `classify` - decision rules on top of the model
//! - `analysis` - the orchestrator
//! - `identity` - anonymization
//! - `config` - injected configuration

pub mod analysis;
pub mod classify;
pub mod config;
pub mod domains;
pub mod features;
pub mod identity;
pub mod logs;
pub mod model;
