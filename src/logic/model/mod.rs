//! Model Layer
//!
//! - `scaler` - standard feature scaling
//! - `forest` - boosted decision-tree ensemble
//! - `isolation` - one-class isolation forest
//! - `training` - dataset loading, splitting, artifact fitting

pub mod forest;
pub mod isolation;
pub mod scaler;
pub mod training;

pub use forest::{BoostParams, BoostedTrees, LabelEncoder, ModelError};
pub use isolation::{IsolationForest, IsolationParams};
pub use scaler::StandardScaler;
pub use training::{
    generate_default_samples, load_training_file, train_with_validation, TrainedArtifact,
    TrainingError, TrainingSample, ValidationReport, MIN_TRAINING_SAMPLES,
};
