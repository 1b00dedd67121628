//! Feature Engineering
//!
//! - `layout` - versioned feature schema (single source of truth)
//! - `vector` - the FeatureVector container
//! - `temporal` - timestamp-derived features
//! - `extract` - the batch extraction pipeline

pub mod extract;
pub mod layout;
pub mod temporal;
pub mod vector;

mod tests;

pub use extract::FeatureExtractor;
pub use layout::{
    feature_index, feature_name, layout_hash, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION,
};
pub use vector::FeatureVector;
