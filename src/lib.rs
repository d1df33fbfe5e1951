// Costlens - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod sheet;
pub mod lookup;
pub mod aggregate;
pub mod verdict;
pub mod error;
pub mod cache;
pub mod extractor;
pub mod source;
pub mod service;
pub mod rankings;
pub mod config;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use sheet::{CityCostSheet, CostRecord, normalize_city_name};
pub use lookup::{
    Category, ItemKey, LabelRule, LabelTable,
    find, find_record, lookup, parse_cost, price_or_zero,
};
pub use aggregate::{aggregate, CategoryCosts, CostBreakdown, ItemCost, MONTHLY_PROFILE};
pub use verdict::{evaluate, Salary, Severity, Suggestion, Verdict};
pub use error::{BudgetError, FetchError, ServiceError};
pub use cache::{CacheEntry, MemoryCache, SheetCache};
pub use extractor::extract_costs;
pub use source::{CostSource, NumbeoSource};
pub use service::{BudgetReport, CityService};
pub use rankings::{CityRanking, Rankings, load_rankings, parse_rankings};
pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build a service backed by the live upstream source and an in-memory cache
///
/// A configured label table replaces the built-in one; failing to load it
/// is an error rather than a silent fallback.
pub fn build_service(config: &Config) -> anyhow::Result<CityService> {
    let source = NumbeoSource::new(config.source_url.clone(), config.fetch_timeout);
    let mut service = CityService::new(
        std::sync::Arc::new(source),
        std::sync::Arc::new(MemoryCache::new()),
        config.cache_ttl_chrono(),
    );

    if let Some(path) = &config.labels_path {
        let labels = LabelTable::from_file(path)?;
        tracing::info!(path = ?path, rules = labels.rule_count(), "loaded label table");
        service = service.with_labels(labels);
    }

    Ok(service)
}

/// Install the tracing subscriber (RUST_LOG, default `info`)
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_build_service_uses_default_labels() {
        let service = build_service(&Config::default()).unwrap();
        assert_eq!(service.labels().rule_count(), LabelTable::default().rule_count());
    }

    #[test]
    fn test_build_service_loads_label_file() {
        let path = std::env::temp_dir().join(format!("costlens-build-labels-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"rules": [{"key": "milk", "fragments": ["Lait"]}]}"#).unwrap();

        let config = Config {
            labels_path: Some(path.clone()),
            ..Config::default()
        };
        let service = build_service(&config);
        std::fs::remove_file(&path).unwrap();

        let service = service.unwrap();
        let records = vec![CostRecord::new("Lait (1 litre)", "1.20")];
        assert_eq!(service.labels().rule_count(), 1);
        assert_eq!(service.labels().lookup(&records, ItemKey::Milk), Some(1.2));
    }

    #[test]
    fn test_build_service_rejects_bad_label_file() {
        let config = Config {
            labels_path: Some(PathBuf::from("/nonexistent/labels.json")),
            ..Config::default()
        };
        assert!(build_service(&config).is_err());
    }
}
