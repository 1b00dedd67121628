//! Context-Aware Domain Resolver
//!
//! Detects tracking/ad domains and re-attributes them to the service that
//! embeds them, using a bounded window of neighboring log entries. Global
//! scans are avoided so unrelated sessions cannot cross-attribute.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::logic::logs::LogEntry;

use super::keywords::{matches_any, TRACKING_PATTERNS};
use super::store::DomainCategoryStore;
use super::types::{CategoryLabel, Subcategory, ALL_LABELS};

/// Entries inspected on each side of the current log entry
pub const CONTEXT_RANGE: usize = 5;

/// Maximum context domains checked for parent attribution
pub const CONTEXT_ATTRIBUTION_LIMIT: usize = 10;

// ============================================================================
// BATCH RESULT
// ============================================================================

/// Per-label pure/tracking counts
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SubcategoryCounts {
    pub pure: u32,
    pub tracking: u32,
}

/// Output of a batch categorization pass
#[derive(Debug, Clone, Default)]
pub struct BatchBreakdown {
    /// Fraction of entries per label, in [0,1]
    pub percentages: HashMap<CategoryLabel, f64>,
    /// Pure vs tracking counts per label
    pub detailed: HashMap<CategoryLabel, SubcategoryCounts>,
}

impl BatchBreakdown {
    fn zeroed() -> Self {
        let mut percentages = HashMap::new();
        let mut detailed = HashMap::new();
        for label in ALL_LABELS {
            percentages.insert(label, 0.0);
            detailed.insert(label, SubcategoryCounts::default());
        }
        Self { percentages, detailed }
    }

    pub fn percentage(&self, label: CategoryLabel) -> f64 {
        self.percentages.get(&label).copied().unwrap_or(0.0)
    }

    pub fn counts(&self, label: CategoryLabel) -> SubcategoryCounts {
        self.detailed.get(&label).copied().unwrap_or_default()
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Context-aware categorizer on top of [`DomainCategoryStore`]
#[derive(Debug, Clone)]
pub struct DomainContextResolver {
    store: DomainCategoryStore,
}

#[derive(Debug)]
pub struct ContextResolveError(pub String);

impl std::fmt::Display for ContextResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContextResolveError: {}", self.0)
    }
}

impl std::error::Error for ContextResolveError {}

impl DomainContextResolver {
    pub fn new(store: DomainCategoryStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DomainCategoryStore {
        &self.store
    }

    /// Categorize one domain with a window of surrounding domains.
    ///
    /// Tracking domains are re-attributed to Entertainment when any of the
    /// first [`CONTEXT_ATTRIBUTION_LIMIT`] non-self context domains
    /// base-categorizes as Entertainment.
    pub fn categorize_with_context(
        &self,
        domain: &str,
        context_domains: &[&str],
    ) -> (CategoryLabel, Subcategory) {
        if domain.trim().is_empty() {
            return (CategoryLabel::Neutral, Subcategory::Pure);
        }

        let mut category = self.store.lookup(domain);

        let domain_lower = domain.to_ascii_lowercase();
        let is_tracking = matches_any(&domain_lower, TRACKING_PATTERNS);

        if is_tracking && !context_domains.is_empty() {
            let entertainment_context = context_domains
                .iter()
                .take(CONTEXT_ATTRIBUTION_LIMIT)
                .filter(|ctx| !ctx.eq_ignore_ascii_case(domain))
                .any(|ctx| self.store.lookup(ctx) == CategoryLabel::Entertainment);

            if entertainment_context {
                category = CategoryLabel::Entertainment;
            }
        }

        let subcategory = if is_tracking { Subcategory::Tracking } else { Subcategory::Pure };
        (category, subcategory)
    }

    /// Categorize every entry of a batch with a +/- [`CONTEXT_RANGE`] window.
    ///
    /// Percentages are fractions of the total entry count; entries without a
    /// domain count as Neutral so the five fractions always sum to 1 for a
    /// non-empty batch. Empty input yields all-zero maps.
    pub fn analyze_batch(&self, logs: &[LogEntry]) -> Result<BatchBreakdown, ContextResolveError> {
        let mut breakdown = BatchBreakdown::zeroed();
        if logs.is_empty() {
            return Ok(breakdown);
        }

        let total = logs.len() as f64;
        let mut counts: HashMap<CategoryLabel, u32> = HashMap::new();

        for (i, log) in logs.iter().enumerate() {
            let start = i.saturating_sub(CONTEXT_RANGE);
            let end = (i + CONTEXT_RANGE + 1).min(logs.len());

            let context: Vec<&str> = logs[start..end]
                .iter()
                .enumerate()
                .filter(|(j, entry)| start + j != i && !entry.domain.is_empty())
                .map(|(_, entry)| entry.domain.as_str())
                .collect();

            let (category, subcategory) = self.categorize_with_context(&log.domain, &context);

            *counts.entry(category).or_insert(0) += 1;
            let entry = breakdown.detailed.entry(category).or_default();
            match subcategory {
                Subcategory::Pure => entry.pure += 1,
                Subcategory::Tracking => entry.tracking += 1,
            }
        }

        for label in ALL_LABELS {
            let count = counts.get(&label).copied().unwrap_or(0) as f64;
            breakdown.percentages.insert(label, count / total);
        }

        Ok(breakdown)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::logs::LogEntry;

    fn resolver() -> DomainContextResolver {
        DomainContextResolver::new(DomainCategoryStore::with_defaults())
    }

    fn entry(domain: &str) -> LogEntry {
        LogEntry {
            domain: domain.to_string(),
            ..LogEntry::default()
        }
    }

    #[test]
    fn test_tracking_attributed_to_entertainment_context() {
        let r = resolver();
        let (cat, sub) =
            r.categorize_with_context("doubleclick.net", &["youtube.com", "google.com"]);
        assert_eq!(cat, CategoryLabel::Entertainment);
        assert_eq!(sub, Subcategory::Tracking);
    }

    #[test]
    fn test_tracking_without_entertainment_context() {
        let r = resolver();
        let (cat, sub) = r.categorize_with_context("doubleclick.net", &["github.com"]);
        assert_eq!(cat, CategoryLabel::Neutral);
        assert_eq!(sub, Subcategory::Tracking);
    }

    #[test]
    fn test_tracking_without_context_keeps_pattern_label() {
        let r = resolver();
        let (cat, sub) = r.categorize_with_context("doubleclick.net", &[]);
        assert_eq!(cat, CategoryLabel::Neutral);
        assert_eq!(sub, Subcategory::Tracking);
    }

    #[test]
    fn test_self_excluded_from_context() {
        let r = resolver();
        // context is only the tracking domain itself - no attribution
        let (cat, _) = r.categorize_with_context("doubleclick.net", &["doubleclick.net"]);
        assert_eq!(cat, CategoryLabel::Neutral);
    }

    #[test]
    fn test_non_tracking_ignores_context() {
        let r = resolver();
        let (cat, sub) = r.categorize_with_context("github.com", &["youtube.com"]);
        assert_eq!(cat, CategoryLabel::Work);
        assert_eq!(sub, Subcategory::Pure);
    }

    #[test]
    fn test_batch_window_attribution() {
        let r = resolver();
        let logs = vec![
            entry("youtube.com"),
            entry("doubleclick.net"),
            entry("youtube.com"),
        ];
        let breakdown = r.analyze_batch(&logs).unwrap();

        // all three land in entertainment, one of them as tracking
        assert!((breakdown.percentage(CategoryLabel::Entertainment) - 1.0).abs() < 1e-9);
        let ent = breakdown.counts(CategoryLabel::Entertainment);
        assert_eq!(ent.pure, 2);
        assert_eq!(ent.tracking, 1);
    }

    #[test]
    fn test_batch_percentages_sum_to_one() {
        let r = resolver();
        let logs = vec![
            entry("youtube.com"),
            entry("github.com"),
            entry("linkedin.com"),
            entry("amazon.com"),
            entry(""),
        ];
        let breakdown = r.analyze_batch(&logs).unwrap();
        let sum: f64 = ALL_LABELS.iter().map(|&l| breakdown.percentage(l)).sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_batch() {
        let r = resolver();
        let breakdown = r.analyze_batch(&[]).unwrap();
        for label in ALL_LABELS {
            assert_eq!(breakdown.percentage(label), 0.0);
        }
    }

    #[test]
    fn test_window_is_bounded() {
        let r = resolver();
        // entertainment domain is 6 positions away - outside the +/-5 window
        let mut logs = vec![entry("youtube.com")];
        for _ in 0..5 {
            logs.push(entry("example.org"));
        }
        logs.push(entry("doubleclick.net"));
        let breakdown = r.analyze_batch(&logs).unwrap();

        // the tracker stays neutral: youtube.com is out of range
        let neutral = breakdown.counts(CategoryLabel::Neutral);
        assert_eq!(neutral.tracking, 1);
    }
}
