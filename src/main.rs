//! Demo pipeline: train (or reuse a training file), analyze a local log
//! file and print the report. The serving layers live elsewhere; this
//! binary only drives the core end to end.

use std::path::Path;

use insightnet_core::logic::analysis::BehaviorAnalyzer;
use insightnet_core::logic::config::AnalyzerConfig;
use insightnet_core::logic::domains::DomainCategoryStore;
use insightnet_core::logic::logs;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let logs_path = std::env::args().nth(1).unwrap_or_else(|| "networkLogs.json".to_string());
    let categories_path = Path::new("domain_categories.json");
    let training_path = Path::new("training_data.json");

    let store = DomainCategoryStore::load_or_default(categories_path);
    let mut analyzer = BehaviorAnalyzer::new(store, AnalyzerConfig::default());

    log::info!("Training behavior model...");
    let report = match analyzer.train_from_file(training_path) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Training failed: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Model ready: validation accuracy {:.1}%, overfitting gap {:.3}",
        report.validation_accuracy * 100.0,
        report.overfitting_gap
    );

    let entries = match logs::load_from_file(Path::new(&logs_path)) {
        Ok(entries) if !entries.is_empty() => entries,
        Ok(_) => {
            log::error!("{} contains no log entries", logs_path);
            std::process::exit(1);
        }
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let result = analyzer.analyze(&entries);

    println!("\n{}", "=".repeat(50));
    println!("NETWORK BEHAVIOR ANALYSIS RESULTS");
    println!("{}", "=".repeat(50));
    println!("User ID: {}", result.user_id);
    println!("Behavior: {}", result.behavior);
    println!("Confidence: {:.1}%", result.confidence * 100.0);
    println!("Anomaly: {}", if result.is_anomaly { "Yes" } else { "No" });
    println!("\nSummary: {}", result.summary);

    let features = &result.features;
    println!("\nFeature Details:");
    println!("- Total Queries: {}", features.total_queries() as u64);
    println!("- Unique Domains: {}", features.get_by_name("unique_domains") as u64);
    println!("- Entertainment: {:.1}%", features.entertainment_pct() * 100.0);
    println!(
        "  - Pure Entertainment: {:.1}%",
        features.get_by_name("pure_entertainment_pct") * 100.0
    );
    println!(
        "  - Entertainment Tracking: {:.1}%",
        features.get_by_name("entertainment_tracking_pct") * 100.0
    );
    println!("- Work: {:.1}%", features.work_pct() * 100.0);
    println!("- Unethical: {:.1}%", features.unethical_pct() * 100.0);
    println!("- Shopping: {:.1}%", features.get_by_name("shopping_pct") * 100.0);
    println!("- Neutral: {:.1}%", features.get_by_name("neutral_pct") * 100.0);
    println!("- Session Duration: {:.1} minutes", features.get_by_name("session_duration"));
    println!("- Domain Entropy: {:.2}", features.domain_entropy());

    if !features.category_counts.is_empty() {
        println!("\nCategory Breakdown:");
        let total = features.total_queries();
        let mut counts: Vec<_> = features.category_counts.iter().collect();
        counts.sort_by(|a, b| b.1.cmp(a.1));
        for (category, count) in counts {
            let pct = if total > 0.0 { *count as f64 / total * 100.0 } else { 0.0 };
            println!("- {}: {} queries ({:.1}%)", category, count, pct);
        }
    }

    if !features.top_domains.is_empty() {
        println!("\nTop Domains:");
        for (domain, count) in &features.top_domains {
            let category = analyzer.extractor().resolver().store().lookup(domain);
            println!("- {}: {} queries ({})", domain, count, category);
        }
    }

    if let Err(e) = analyzer.save_results(Path::new("behavior_results.json")) {
        log::warn!("Could not save results: {}", e);
    }

    println!("\n{}", "=".repeat(50));
    println!("Analysis completed. Results saved to 'behavior_results.json'");
}
