// 🏙️ City Service - Cache-aware sheet retrieval + verdicts
//
// Flow for a city request:
// 1. Normalize the name ("new york" → "New-York")
// 2. Fresh cache entry? → serve it
// 3. Fetch from the source → store, serve
// 4. Fetch failed but a stale entry exists → serve the stale entry
// 5. Otherwise → propagate the fetch error

use crate::aggregate::{aggregate, CostBreakdown, ItemCost};
use crate::cache::{CacheEntry, SheetCache};
use crate::error::ServiceError;
use crate::lookup::LabelTable;
use crate::sheet::{normalize_city_name, CityCostSheet};
use crate::source::CostSource;
use crate::verdict::{evaluate, Salary, Verdict};
use chrono::{Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// BudgetReport - Verdict plus the context it was computed from
#[derive(Debug, Clone, Serialize)]
pub struct BudgetReport {
    pub city: String,
    pub salary: f64,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub items: Vec<ItemCost>,
}

impl BudgetReport {
    pub fn new(city: impl Into<String>, salary: Salary, breakdown: CostBreakdown) -> Self {
        let verdict = evaluate(salary, &breakdown);
        BudgetReport {
            city: city.into(),
            salary: salary.amount(),
            verdict,
            items: breakdown.items,
        }
    }
}

#[derive(Clone)]
pub struct CityService {
    source: Arc<dyn CostSource>,
    cache: Arc<dyn SheetCache>,
    labels: Arc<LabelTable>,
    ttl: Duration,
}

impl CityService {
    pub fn new(source: Arc<dyn CostSource>, cache: Arc<dyn SheetCache>, ttl: Duration) -> Self {
        CityService {
            source,
            cache,
            labels: Arc::new(LabelTable::default()),
            ttl,
        }
    }

    /// Builder pattern: swap in a custom label vocabulary
    pub fn with_labels(mut self, labels: LabelTable) -> Self {
        self.labels = Arc::new(labels);
        self
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    /// Get the cost sheet for a city, from cache when fresh
    pub async fn sheet(&self, city: &str) -> Result<CityCostSheet, ServiceError> {
        let key = normalize_city_name(city);
        if key.is_empty() {
            return Err(ServiceError::EmptyCity);
        }

        let cached = self.cache.get(&key);
        if let Some(entry) = &cached {
            if entry.is_fresh(Utc::now(), self.ttl) {
                info!(city = %key, "serving from cache");
                return Ok(entry.sheet.clone());
            }
        }

        info!(city = %key, source = self.source.name(), "fetching cost sheet");
        match self.source.fetch(&key).await {
            Ok(sheet) => {
                self.cache.put(&key, CacheEntry::new(sheet.clone()));
                Ok(sheet)
            }
            Err(err) => match cached {
                Some(stale) => {
                    warn!(city = %key, error = %err, "fetch failed, serving stale cache");
                    Ok(stale.sheet)
                }
                None => Err(err.into()),
            },
        }
    }

    /// Aggregate a sheet with this service's label vocabulary
    pub fn breakdown(&self, sheet: &CityCostSheet) -> CostBreakdown {
        aggregate(&sheet.costs, &self.labels)
    }

    /// Fetch (or reuse) a city's sheet and evaluate a salary against it
    pub async fn report(&self, city: &str, salary: Salary) -> Result<BudgetReport, ServiceError> {
        let sheet = self.sheet(city).await?;
        let breakdown = self.breakdown(&sheet);
        Ok(BudgetReport::new(sheet.city, salary, breakdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::error::FetchError;
    use crate::sheet::CostRecord;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Serves a fixed sheet until told to fail
    struct FakeSource {
        calls: AtomicUsize,
        failing: AtomicBool,
    }

    impl FakeSource {
        fn new() -> Arc<Self> {
            Arc::new(FakeSource {
                calls: AtomicUsize::new(0),
                failing: AtomicBool::new(false),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CostSource for FakeSource {
        async fn fetch(&self, city: &str) -> Result<CityCostSheet, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(FetchError::Status { city: city.to_string(), status: 503 });
            }
            if city == "Atlantis" {
                return Err(FetchError::Status { city: city.to_string(), status: 404 });
            }
            Ok(CityCostSheet::new(
                city,
                vec![
                    CostRecord::new("Apartment (1 bedroom) in City Centre", "1,500.00"),
                    CostRecord::new("Apartment (1 bedroom) Outside of Centre", "1,000.00"),
                    CostRecord::new("Meal, Inexpensive Restaurant", "20.00"),
                    CostRecord::new("Monthly Pass (Regular Price)", "100.00"),
                ],
            ))
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn service(source: Arc<FakeSource>, ttl: Duration) -> (CityService, Arc<MemoryCache>) {
        let cache = Arc::new(MemoryCache::new());
        (CityService::new(source, cache.clone(), ttl), cache)
    }

    #[tokio::test]
    async fn test_fetches_and_normalizes_city() {
        let source = FakeSource::new();
        let (service, cache) = service(source.clone(), Duration::hours(1));

        let sheet = service.sheet("new york").await.unwrap();

        assert_eq!(sheet.city, "New-York");
        assert_eq!(sheet.costs.len(), 4);
        assert!(cache.get("New-York").is_some());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_fetch() {
        let source = FakeSource::new();
        let (service, _cache) = service(source.clone(), Duration::hours(1));

        service.sheet("london").await.unwrap();
        service.sheet("London").await.unwrap();
        service.sheet("  LONDON").await.unwrap();

        // "LONDON" normalizes to a different key than "London"
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refreshed() {
        let source = FakeSource::new();
        let (service, _cache) = service(source.clone(), Duration::zero());

        service.sheet("Paris").await.unwrap();
        service.sheet("Paris").await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_stale_fallback_on_fetch_failure() {
        let source = FakeSource::new();
        let (service, cache) = service(source.clone(), Duration::hours(1));
        cache.put(
            "Paris",
            CacheEntry {
                fetched_at: Utc::now() - Duration::hours(2),
                sheet: CityCostSheet::new("Paris", vec![CostRecord::new("Monthly Pass", "86")]),
            },
        );
        source.failing.store(true, Ordering::SeqCst);

        let sheet = service.sheet("paris").await.unwrap();

        assert_eq!(sheet.costs, vec![CostRecord::new("Monthly Pass", "86")]);
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_without_cache_propagates() {
        let source = FakeSource::new();
        let (service, _cache) = service(source, Duration::hours(1));

        let err = service.sheet("atlantis").await.unwrap_err();

        match err {
            ServiceError::Fetch(fetch) => assert!(fetch.is_not_found()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_city_rejected() {
        let source = FakeSource::new();
        let (service, _cache) = service(source.clone(), Duration::hours(1));

        assert!(matches!(service.sheet(" -- ").await, Err(ServiceError::EmptyCity)));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_report() {
        let source = FakeSource::new();
        let (service, _cache) = service(source, Duration::hours(1));

        let report = service
            .report("berlin", Salary::new(1500.0).unwrap())
            .await
            .unwrap();

        // housing 1500 + food 80 + transport 100
        assert_eq!(report.city, "Berlin");
        assert_eq!(report.verdict.total, 1680.0);
        assert_eq!(report.verdict.diff, -180.0);
        assert!(report.verdict.suggestions[1].text.starts_with("MOVE OUT"));
        assert!(!report.items.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["city"], "Berlin");
        assert_eq!(json["total"], 1680.0);
        assert_eq!(json["category_costs"]["housing"], 1500.0);
        assert_eq!(json["suggestions"][0]["severity"], "bad");
    }
}
