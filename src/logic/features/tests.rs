//! Integration Tests for Feature Extraction
//!
//! Exercises the full extraction pipeline over realistic log batches.

#[cfg(test)]
mod integration_tests {
    use crate::logic::domains::{DomainCategoryStore, DomainContextResolver};
    use crate::logic::features::extract::FeatureExtractor;
    use crate::logic::features::layout::FEATURE_COUNT;
    use crate::logic::logs::LogEntry;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(DomainContextResolver::new(DomainCategoryStore::with_defaults()))
    }

    fn entry(domain: &str, timestamp: &str) -> LogEntry {
        LogEntry {
            domain: domain.to_string(),
            timestamp: timestamp.to_string(),
            ..LogEntry::default()
        }
    }

    fn mixed_batch() -> Vec<LogEntry> {
        vec![
            entry("youtube.com", "2025-10-06T09:00:00Z"),
            entry("youtube.com", "2025-10-06T09:01:00Z"),
            entry("github.com", "2025-10-06T09:02:00Z"),
            entry("stackoverflow.com", "2025-10-06T09:04:00Z"),
            entry("linkedin.com", "2025-10-06T09:06:00Z"),
            entry("amazon.com", "2025-10-06T09:08:00Z"),
            entry("google.com", "2025-10-06T09:10:00Z"),
            entry("netflix.com", "2025-10-06T09:12:00Z"),
        ]
    }

    #[test]
    fn test_category_percentages_sum_to_one() {
        let vector = extractor().extract(&mixed_batch(), 30);
        let sum = vector.entertainment_pct()
            + vector.work_pct()
            + vector.unethical_pct()
            + vector.get_by_name("neutral_pct")
            + vector.get_by_name("shopping_pct");
        assert!((sum - 1.0).abs() < 1e-6, "percentages sum to {}", sum);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let logs = mixed_batch();
        let ex = extractor();
        let first = ex.extract(&logs, 30);
        let second = ex.extract(&logs, 30);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_batch_canonical_vector() {
        let vector = extractor().extract(&[], 30);
        assert_eq!(vector.total_queries(), 0.0);
        assert_eq!(vector.get_by_name("session_duration"), 1.0);
        assert_eq!(vector.peak_activity_hour(), 12.0);
        assert_eq!(vector.get_by_name("weekend_activity"), 0.5);
        assert!(vector.top_domains.is_empty());
        assert!(vector.category_counts.is_empty());
    }

    #[test]
    fn test_basic_counts() {
        let vector = extractor().extract(&mixed_batch(), 30);
        assert_eq!(vector.total_queries(), 8.0);
        assert_eq!(vector.get_by_name("unique_domains"), 7.0);

        // youtube.com is queried twice out of 8
        assert!((vector.get_by_name("top_domain_concentration") - 0.25).abs() < 1e-9);
        assert_eq!(vector.top_domains[0].0, "youtube.com");
        assert_eq!(vector.top_domains[0].1, 2);
        assert!(vector.top_domains.len() <= 5);
    }

    #[test]
    fn test_temporal_features() {
        let vector = extractor().extract(&mixed_batch(), 30);
        // 09:00 .. 09:12
        assert!((vector.get_by_name("session_duration") - 12.0).abs() < 1e-9);
        assert!((vector.queries_per_minute() - 8.0 / 12.0).abs() < 1e-9);
        assert_eq!(vector.peak_activity_hour(), 9.0);
        // 2025-10-06 is a Monday
        assert_eq!(vector.get_by_name("weekend_activity"), 0.0);
    }

    #[test]
    fn test_unparseable_timestamps_use_defaults() {
        let logs = vec![entry("youtube.com", "garbage"), entry("github.com", "")];
        let vector = extractor().extract(&logs, 30);
        assert_eq!(vector.get_by_name("session_duration"), 1.0);
        assert_eq!(vector.peak_activity_hour(), 12.0);
        assert_eq!(vector.get_by_name("weekend_activity"), 0.5);
        // rate falls back to total / floor
        assert_eq!(vector.queries_per_minute(), 2.0);
    }

    #[test]
    fn test_blocked_queries_pct() {
        let mut logs = mixed_batch();
        logs[0].status = "blocked".to_string();
        logs[1].status = "BLOCKED".to_string();
        let vector = extractor().extract(&logs, 30);
        assert!((vector.get_by_name("blocked_queries_pct") - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_infra_noise_excluded_from_categories_only() {
        // 2 entertainment + 2 infra entries
        let logs = vec![
            entry("youtube.com", ""),
            entry("netflix.com", ""),
            entry("firebaseinstallations.googleapis.com", ""),
            entry("reports.crashlytics.com", ""),
        ];
        let vector = extractor().extract(&logs, 30);

        // category view: infra removed, batch is pure entertainment
        assert!((vector.entertainment_pct() - 1.0).abs() < 1e-6);

        // frequency view: infra still counted
        assert_eq!(vector.total_queries(), 4.0);
        assert_eq!(vector.get_by_name("unique_domains"), 4.0);

        // filter disabled: infra dilutes the percentages
        let ex = extractor().with_infra_filter(false);
        let unfiltered = ex.extract(&logs, 30);
        assert!(unfiltered.entertainment_pct() < 1.0);
    }

    #[test]
    fn test_tracking_attribution_feeds_percentages() {
        let logs = vec![
            entry("youtube.com", ""),
            entry("doubleclick.net", ""),
            entry("youtube.com", ""),
        ];
        let vector = extractor().extract(&logs, 30);

        assert!((vector.entertainment_pct() - 1.0).abs() < 1e-6);
        assert!((vector.get_by_name("pure_entertainment_pct") - 2.0 / 3.0).abs() < 1e-6);
        assert!((vector.get_by_name("entertainment_tracking_pct") - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_sub_signal_percentages() {
        let logs = vec![
            entry("facebook.com", ""),
            entry("youtube.com", ""),
            entry("github.com", ""),
            entry("example.org", ""),
        ];
        let vector = extractor().extract(&logs, 30);
        assert!((vector.get_by_name("social_media_pct") - 0.25).abs() < 1e-9);
        assert!((vector.get_by_name("streaming_pct") - 0.25).abs() < 1e-9);
        assert!((vector.get_by_name("dev_tools_pct") - 0.25).abs() < 1e-9);
        assert_eq!(vector.get_by_name("cloud_services_pct"), 0.0);
    }

    #[test]
    fn test_entropy_behavior() {
        // one domain repeated: zero entropy
        let repetitive: Vec<LogEntry> = (0..20).map(|_| entry("youtube.com", "")).collect();
        let v = extractor().extract(&repetitive, 30);
        assert_eq!(v.domain_entropy(), 0.0);

        // four equally likely domains: 2 bits
        let diverse = vec![
            entry("a.com", ""),
            entry("b.com", ""),
            entry("c.com", ""),
            entry("d.com", ""),
        ];
        let v = extractor().extract(&diverse, 30);
        assert!((v.domain_entropy() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_percentage_fields_in_unit_range() {
        let vector = extractor().extract(&mixed_batch(), 30);
        for name in [
            "entertainment_pct",
            "work_pct",
            "unethical_pct",
            "neutral_pct",
            "shopping_pct",
            "blocked_queries_pct",
            "social_media_pct",
            "streaming_pct",
            "dev_tools_pct",
            "cloud_services_pct",
            "pure_entertainment_pct",
            "entertainment_tracking_pct",
            "weekend_activity",
            "top_domain_concentration",
        ] {
            let v = vector.get_by_name(name);
            assert!((0.0..=1.0).contains(&v), "{} = {} out of range", name, v);
        }
        assert_eq!(vector.as_slice().len(), FEATURE_COUNT);
    }
}
