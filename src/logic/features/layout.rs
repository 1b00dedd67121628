//! Feature Layout - Centralized Feature Definition
//!
//! This file controls the feature schema used by the model.
//!
//! Rules:
//! 1. Add feature -> increment FEATURE_VERSION
//! 2. Change order -> increment FEATURE_VERSION
//! 3. Remove feature -> increment FEATURE_VERSION
//!
//! Versioning keeps training data, installed artifacts and replayed logs
//! compatible across releases.

use crc32fast::Hasher;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version.
/// v1 was the 10-column layout without tracking attribution or sub-signals.
pub const FEATURE_VERSION: u8 = 2;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in the exact order they appear in the vector.
/// Single source of truth for the model input layout.
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Volume (0-1) ===
    "total_queries",             // 0: Number of log entries
    "unique_domains",            // 1: Distinct domains queried

    // === Category percentages (2-6) ===
    "entertainment_pct",         // 2
    "work_pct",                  // 3
    "unethical_pct",             // 4
    "neutral_pct",               // 5
    "shopping_pct",              // 6

    // === Temporal (7-8) ===
    "session_duration",          // 7: Minutes between first and last entry
    "queries_per_minute",        // 8

    // === Diversity & concentration (9-12) ===
    "domain_entropy",            // 9: Shannon entropy of the domain counts
    "top_domain_concentration",  // 10: Share of the most queried domain
    "blocked_queries_pct",       // 11
    "category_diversity",        // 12: Distinct labels observed

    // === Activity patterns (13-14) ===
    "peak_activity_hour",        // 13: Most frequent hour of day
    "weekend_activity",          // 14: Weekend fraction of timestamps

    // === Query shape (15-16) ===
    "avg_query_length",          // 15
    "query_length_variance",     // 16

    // === Sub-signals (17-20) ===
    "social_media_pct",          // 17
    "streaming_pct",             // 18
    "dev_tools_pct",             // 19
    "cloud_services_pct",        // 20

    // === Tracking attribution (21-22) ===
    "pure_entertainment_pct",    // 21
    "entertainment_tracking_pct",// 22
];

/// Total number of features.
/// Must match FEATURE_LAYOUT.len()
pub const FEATURE_COUNT: usize = 23;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + ordered feature names, for mismatch detection
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }
    hasher.finalize()
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when a serialized vector does not match the current layout
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Feature layout mismatch: expected v{} (hash: {:08x}), got v{} (hash: {:08x})",
            self.expected_version, self.expected_hash, self.actual_version, self.actual_hash
        )
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate that incoming data matches the current layout
pub fn validate_layout(version: u8, hash: u32) -> Result<(), LayoutMismatchError> {
    let current = layout_hash();
    if version != FEATURE_VERSION || hash != current {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current,
            actual_version: version,
            actual_hash: hash,
        });
    }
    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Index of a feature by name (O(n), the layout is small)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Feature name at an index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 23);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_stable() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash()).is_ok());
        assert!(validate_layout(FEATURE_VERSION + 1, layout_hash()).is_err());
        assert!(validate_layout(FEATURE_VERSION, layout_hash().wrapping_add(1)).is_err());
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("total_queries"), Some(0));
        assert_eq!(feature_index("entertainment_pct"), Some(2));
        assert_eq!(feature_index("entertainment_tracking_pct"), Some(22));
        assert_eq!(feature_index("nonexistent"), None);
    }

    #[test]
    fn test_feature_name() {
        assert_eq!(feature_name(0), Some("total_queries"));
        assert_eq!(feature_name(22), Some("entertainment_tracking_pct"));
        assert_eq!(feature_name(FEATURE_COUNT), None);
    }
}
