//! InsightNet Core - Network Behavior Analysis
//!
//! Classifies a user's DNS query activity into behavioral categories
//! (entertainment, work, unethical, shopping, neutral) with a boosted
//! tree ensemble over engineered features, plus dual anomaly detection.
//!
//! # Pipeline
//!
//! 1. **Domain categorization** - static store lookup with prefix
//!    stripping, a subdomain walk and keyword fallback; tracking/ad
//!    domains are attributed to the neighboring service that embeds them.
//! 2. **Feature extraction** - a batch of [`logic::logs::LogEntry`]s
//!    becomes a fixed, versioned [`logic::features::FeatureVector`].
//! 3. **Classification** - scaled features run through the trained
//!    artifact; deterministic overrides inject domain policy after
//!    inference; anomalies come from an isolation forest OR'd with
//!    rule-based checks.
//! 4. **Orchestration** - [`logic::analysis::BehaviorAnalyzer`] ties it
//!    together and keeps the result history.
//!
//! ```no_run
//! use insightnet_core::logic::analysis::BehaviorAnalyzer;
//! use insightnet_core::logic::logs;
//!
//! let mut analyzer = BehaviorAnalyzer::with_defaults();
//! analyzer.train_from_file(std::path::Path::new("training_data.json")).unwrap();
//!
//! let entries = logs::load_from_file(std::path::Path::new("networkLogs.json")).unwrap();
//! let result = analyzer.analyze(&entries);
//! println!("{}", result.summary);
//! ```

pub mod logic;

pub use logic::analysis::{AnalysisResult, BehaviorAnalyzer};
pub use logic::classify::{BehaviorClassifier, Prediction};
pub use logic::config::AnalyzerConfig;
pub use logic::domains::{CategoryLabel, DomainCategoryStore, DomainContextResolver, Subcategory};
pub use logic::features::{FeatureExtractor, FeatureVector};
pub use logic::logs::LogEntry;
