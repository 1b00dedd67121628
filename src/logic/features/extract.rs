//! Feature Extraction Pipeline
//!
//! Turns a batch of DNS log entries into a fixed-size [`FeatureVector`].
//! Every sub-step degrades to documented defaults instead of failing; the
//! extractor never returns an error to its caller.

use std::collections::HashMap;

use crate::logic::domains::keywords::{
    matches_any, CLOUD_SERVICE_PATTERNS, DEV_TOOLS_PATTERNS, INFRA_NOISE_PATTERNS,
    SOCIAL_MEDIA_PATTERNS, STREAMING_PATTERNS,
};
use crate::logic::domains::{CategoryLabel, DomainContextResolver, ALL_LABELS};
use crate::logic::logs::LogEntry;

use super::temporal;
use super::vector::FeatureVector;

/// Number of domains reported in `top_domains`
const TOP_DOMAIN_LIMIT: usize = 5;

// ============================================================================
// EXTRACTOR
// ============================================================================

/// Batch feature extractor over the context-aware categorizer
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    resolver: DomainContextResolver,
    /// When set, SDK/infra chatter is excluded from category percentages.
    /// The domain frequency table and blocked stats always see the full set:
    /// blocking behavior is itself a signal.
    infra_filter_enabled: bool,
}

impl FeatureExtractor {
    pub fn new(resolver: DomainContextResolver) -> Self {
        Self {
            resolver,
            infra_filter_enabled: true,
        }
    }

    pub fn with_infra_filter(mut self, enabled: bool) -> Self {
        self.infra_filter_enabled = enabled;
        self
    }

    pub fn resolver(&self) -> &DomainContextResolver {
        &self.resolver
    }

    /// Extract the full feature vector for one analysis window.
    ///
    /// `window_minutes` is the caller's nominal window size; rate features
    /// are derived from observed timestamps, not from it.
    pub fn extract(&self, logs: &[LogEntry], window_minutes: u32) -> FeatureVector {
        if logs.is_empty() {
            return FeatureVector::empty();
        }

        log::debug!(
            "Extracting features from {} entries (window {} min)",
            logs.len(),
            window_minutes
        );

        let total_queries = logs.len() as f64;
        let mut vector = FeatureVector::new();
        vector.set_by_name("total_queries", total_queries);

        // Category percentages over the infra-filtered set
        let category_logs = self.filter_infra(logs);
        self.category_features(category_logs, &mut vector);

        // Domain frequency table over the unfiltered set
        let mut domain_counts: HashMap<&str, u32> = HashMap::new();
        let mut blocked = 0u32;
        for log in logs {
            if !log.domain.is_empty() {
                *domain_counts.entry(log.domain.as_str()).or_insert(0) += 1;
            }
            if log.is_blocked() {
                blocked += 1;
            }
        }

        vector.set_by_name("unique_domains", domain_counts.len() as f64);
        vector.set_by_name("blocked_queries_pct", blocked as f64 / total_queries);

        let top_count = domain_counts.values().copied().max().unwrap_or(0);
        vector.set_by_name("top_domain_concentration", top_count as f64 / total_queries);

        // Temporal features
        let raw_timestamps: Vec<&str> = logs
            .iter()
            .filter(|l| !l.timestamp.is_empty())
            .map(|l| l.timestamp.as_str())
            .collect();
        let times = temporal::parse_all(&raw_timestamps);

        let duration = temporal::session_duration_minutes(&times);
        vector.set_by_name("session_duration", duration);
        vector.set_by_name("queries_per_minute", total_queries / duration.max(1.0));
        vector.set_by_name("peak_activity_hour", temporal::peak_activity_hour(&times));
        vector.set_by_name("weekend_activity", temporal::weekend_ratio(&times));

        // Diversity
        let counts: Vec<u32> = domain_counts.values().copied().collect();
        vector.set_by_name("domain_entropy", shannon_entropy(&counts));

        let distinct_labels: std::collections::HashSet<CategoryLabel> = domain_counts
            .keys()
            .map(|d| self.resolver.store().lookup(d))
            .collect();
        vector.set_by_name("category_diversity", distinct_labels.len() as f64);

        // Query shape
        let lengths: Vec<f64> = logs.iter().map(|l| l.domain.len() as f64).collect();
        let (mean, variance) = mean_and_variance(&lengths);
        vector.set_by_name("avg_query_length", mean);
        vector.set_by_name("query_length_variance", variance);

        // Sub-signal percentages
        vector.set_by_name("social_media_pct", pattern_pct(logs, SOCIAL_MEDIA_PATTERNS));
        vector.set_by_name("streaming_pct", pattern_pct(logs, STREAMING_PATTERNS));
        vector.set_by_name("dev_tools_pct", pattern_pct(logs, DEV_TOOLS_PATTERNS));
        vector.set_by_name("cloud_services_pct", pattern_pct(logs, CLOUD_SERVICE_PATTERNS));

        // Reporting metadata
        vector.top_domains = top_domains(&domain_counts);
        vector.category_counts = self.category_counts(logs);

        vector
    }

    /// Entries without infra/SDK chatter. Falls back to the full set when
    /// the filter would remove everything, so the percentage invariant
    /// still holds.
    fn filter_infra<'a>(&self, logs: &'a [LogEntry]) -> Vec<&'a LogEntry> {
        if !self.infra_filter_enabled {
            return logs.iter().collect();
        }

        let filtered: Vec<&LogEntry> = logs
            .iter()
            .filter(|l| !matches_any(&l.domain.to_ascii_lowercase(), INFRA_NOISE_PATTERNS))
            .collect();

        if filtered.is_empty() {
            log::debug!("Infra filter removed all {} entries, using full set", logs.len());
            logs.iter().collect()
        } else {
            filtered
        }
    }

    /// Five category percentages plus tracking attribution, with the basic
    /// per-domain fallback when the context pass fails
    fn category_features(&self, category_logs: Vec<&LogEntry>, vector: &mut FeatureVector) {
        let owned: Vec<LogEntry> = category_logs.iter().map(|&l| l.clone()).collect();
        let total = owned.len() as f64;

        match self.resolver.analyze_batch(&owned) {
            Ok(breakdown) => {
                vector.set_by_name(
                    "entertainment_pct",
                    breakdown.percentage(CategoryLabel::Entertainment),
                );
                vector.set_by_name("work_pct", breakdown.percentage(CategoryLabel::Work));
                vector.set_by_name("unethical_pct", breakdown.percentage(CategoryLabel::Unethical));
                vector.set_by_name("neutral_pct", breakdown.percentage(CategoryLabel::Neutral));
                vector.set_by_name("shopping_pct", breakdown.percentage(CategoryLabel::Shopping));

                let ent = breakdown.counts(CategoryLabel::Entertainment);
                if total > 0.0 {
                    vector.set_by_name("pure_entertainment_pct", ent.pure as f64 / total);
                    vector.set_by_name("entertainment_tracking_pct", ent.tracking as f64 / total);
                }
            }
            Err(e) => {
                log::warn!("Context analysis failed: {} - using basic categorization", e);
                let mut counts: HashMap<CategoryLabel, u32> = HashMap::new();
                for log in &owned {
                    let label = self.resolver.store().lookup(&log.domain);
                    *counts.entry(label).or_insert(0) += 1;
                }
                for label in ALL_LABELS {
                    let pct = if total > 0.0 {
                        counts.get(&label).copied().unwrap_or(0) as f64 / total
                    } else {
                        0.0
                    };
                    vector.set_by_name(&format!("{}_pct", label.as_str()), pct);
                }
            }
        }
    }

    /// Per-entry base category counts (reporting metadata, unfiltered)
    fn category_counts(&self, logs: &[LogEntry]) -> HashMap<CategoryLabel, u32> {
        let mut counts: HashMap<CategoryLabel, u32> = HashMap::new();
        for log in logs {
            if !log.domain.is_empty() {
                let label = self.resolver.store().lookup(&log.domain);
                *counts.entry(label).or_insert(0) += 1;
            }
        }
        counts
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Shannon entropy (base 2) of a count distribution
pub fn shannon_entropy(counts: &[u32]) -> f64 {
    let total: u64 = counts.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return 0.0;
    }

    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

/// Population mean and variance
fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance)
}

/// Fraction of entries whose domain matches any pattern
fn pattern_pct(logs: &[LogEntry], patterns: &[&str]) -> f64 {
    if logs.is_empty() {
        return 0.0;
    }
    let hits = logs
        .iter()
        .filter(|l| matches_any(&l.domain.to_ascii_lowercase(), patterns))
        .count();
    hits as f64 / logs.len() as f64
}

/// Top domains by count, descending; name breaks ties for determinism
fn top_domains(domain_counts: &HashMap<&str, u32>) -> Vec<(String, u32)> {
    let mut entries: Vec<(&str, u32)> = domain_counts.iter().map(|(&d, &c)| (d, c)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(TOP_DOMAIN_LIMIT)
        .map(|(d, c)| (d.to_string(), c))
        .collect()
}
