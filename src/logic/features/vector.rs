//! Feature Vector - Core data structure for model input
//!
//! Versioned feature vector with layout validation. All feature data moves
//! through this struct; never hand raw `Vec<f64>`s to the model.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::logic::domains::CategoryLabel;

use super::layout::{
    feature_index, layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT,
    FEATURE_LAYOUT, FEATURE_VERSION,
};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Engineered features for one analysis window, in layout order,
/// plus the reporting metadata that rides along with them
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 of the feature layout (mismatch detection)
    pub layout_hash: u32,
    /// Feature values in FEATURE_LAYOUT order
    pub values: [f64; FEATURE_COUNT],
    /// Top 5 most queried domains with counts, descending
    pub top_domains: Vec<(String, u32)>,
    /// Query count per observed category
    pub category_counts: HashMap<CategoryLabel, u32>,
}

impl FeatureVector {
    /// Zeroed vector with the current version
    pub fn new() -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values: [0.0; FEATURE_COUNT],
            top_domains: Vec::new(),
            category_counts: HashMap::new(),
        }
    }

    /// Canonical vector for an empty log batch.
    /// Neutral defaults: one-minute session, noon peak, even weekend split.
    pub fn empty() -> Self {
        let mut v = Self::new();
        v.set_by_name("session_duration", 1.0);
        v.set_by_name("peak_activity_hour", 12.0);
        v.set_by_name("weekend_activity", 0.5);
        v
    }

    /// Values as a slice, in layout order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Feature by index
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Feature by name; absent names read as 0
    pub fn get_by_name(&self, name: &str) -> f64 {
        feature_index(name)
            .and_then(|i| self.get(i))
            .unwrap_or(0.0)
    }

    /// Set feature by index
    pub fn set(&mut self, index: usize, value: f64) {
        if index < FEATURE_COUNT {
            self.values[index] = value;
        }
    }

    /// Set feature by name; returns false for unknown names
    pub fn set_by_name(&mut self, name: &str, value: f64) -> bool {
        match feature_index(name) {
            Some(index) => {
                self.set(index, value);
                true
            }
            None => false,
        }
    }

    /// Validate this vector against the current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    // Typed accessors for the fields the decision rules read

    pub fn total_queries(&self) -> f64 {
        self.get_by_name("total_queries")
    }

    pub fn entertainment_pct(&self) -> f64 {
        self.get_by_name("entertainment_pct")
    }

    pub fn work_pct(&self) -> f64 {
        self.get_by_name("work_pct")
    }

    pub fn unethical_pct(&self) -> f64 {
        self.get_by_name("unethical_pct")
    }

    pub fn queries_per_minute(&self) -> f64 {
        self.get_by_name("queries_per_minute")
    }

    pub fn domain_entropy(&self) -> f64 {
        self.get_by_name("domain_entropy")
    }

    pub fn peak_activity_hour(&self) -> f64 {
        self.get_by_name("peak_activity_hour")
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

// Serialized as a flat named map so external consumers never depend on
// the internal array layout
impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT + 4))?;
        map.serialize_entry("feature_version", &self.version)?;
        map.serialize_entry("layout_hash", &self.layout_hash)?;
        for (name, value) in FEATURE_LAYOUT.iter().zip(self.values.iter()) {
            map.serialize_entry(name, value)?;
        }

        let top: Vec<(&str, u32)> = self
            .top_domains
            .iter()
            .map(|(d, c)| (d.as_str(), *c))
            .collect();
        map.serialize_entry("top_domains", &top)?;

        let counts: HashMap<&str, u32> = self
            .category_counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        map.serialize_entry("category_counts", &counts)?;
        map.end()
    }
}

// ============================================================================
// TESTS
// ============================================================================
