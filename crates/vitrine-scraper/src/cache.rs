//! Run-scoped dedup cache for detail-page extraction results.
//!
//! Keys are cleaned URLs (query string stripped), so the same product reached
//! through different listing sort orders is fetched once per run. The cache
//! is safe for concurrent workers; two workers racing on the same miss will
//! both fetch, and the last write wins. Duplicate work, not corruption,
//! since the persistence layer dedups structurally.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use vitrine_core::ProductRecord;

use crate::clean::clean_url;

pub struct FetchCache {
    entries: Mutex<HashMap<String, Vec<ProductRecord>>>,
    cache_negative_results: bool,
}

impl FetchCache {
    /// Creates an empty cache.
    ///
    /// When `cache_negative_results` is `true` (the reference behavior) an
    /// empty extraction (failed fetch, missing payload) is stored too, so
    /// the page is never retried within the run. `false` keeps misses
    /// retryable at the cost of repeat fetches for genuinely empty pages.
    #[must_use]
    pub fn new(cache_negative_results: bool) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            cache_negative_results,
        }
    }

    /// Returns the cached records for `url`, or runs `fetch` and caches its
    /// result. The key is always `clean_url(url)`; `fetch` is responsible
    /// for requesting whatever URL form it prefers.
    pub async fn get_or_fetch<F, Fut>(&self, url: &str, fetch: F) -> Vec<ProductRecord>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<ProductRecord>>,
    {
        let key = clean_url(url);

        if let Some(cached) = self.lookup(&key) {
            tracing::info!(url = %key, "using cached product data");
            return cached;
        }

        let records = fetch().await;

        if !records.is_empty() || self.cache_negative_results {
            self.entries
                .lock()
                .expect("cache lock poisoned")
                .insert(key, records.clone());
        }

        records
    }

    /// Number of cached URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &str) -> Option<Vec<ProductRecord>> {
        self.entries
            .lock()
            .expect("cache lock poisoned")
            .get(key)
            .cloned()
    }
}
