// 🗃️ Sheet Cache - Time-bounded memo of city cost sheets
//
// Entries are immutable snapshots keyed by normalized city name. Concurrent
// refreshes of the same city are last-writer-wins.

use crate::sheet::CityCostSheet;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// How long a fetched sheet stays fresh by default.
pub const DEFAULT_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub fetched_at: DateTime<Utc>,
    pub sheet: CityCostSheet,
}

impl CacheEntry {
    pub fn new(sheet: CityCostSheet) -> Self {
        CacheEntry {
            fetched_at: Utc::now(),
            sheet,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.fetched_at
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.age(now) < ttl
    }
}

/// SheetCache - Storage seam for cost sheets
///
/// `get` hands back a copy; callers never share mutable state with the cache.
pub trait SheetCache: Send + Sync {
    fn get(&self, key: &str) -> Option<CacheEntry>;
    fn put(&self, key: &str, entry: CacheEntry);
}

/// In-memory cache, one entry per city, no size bound
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SheetCache for MemoryCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        // A poisoned lock still holds valid snapshots
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn put(&self, key: &str, entry: CacheEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), entry);
    }
}
