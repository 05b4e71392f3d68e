use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use crate::core::error::{Error, Result};
use crate::query::ast::{Query, QueryOutput};

/// Query cache for avoiding recomputation.
///
/// Entries never go stale: the catalog behind an executor is read-only.
pub struct QueryCache {
    cache: Mutex<LruCache<Query, QueryOutput>>,
    pub size_limit: usize,
    hit_count: AtomicUsize,
    miss_count: AtomicUsize,
}

impl QueryCache {
    pub fn new(size_limit: usize) -> Result<Self> {
        let cap = NonZeroUsize::new(size_limit)
            .ok_or_else(|| Error::invalid_argument("query cache needs room for at least one entry"))?;
        Ok(QueryCache {
            cache: Mutex::new(LruCache::new(cap)),
            size_limit,
            hit_count: AtomicUsize::new(0),
            miss_count: AtomicUsize::new(0),
        })
    }

    pub fn get(&self, key: &Query) -> Option<QueryOutput> {
        let mut cache = self.cache.lock();
        if let Some(output) = cache.get(key) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            Some(output.clone())
        } else {
            self.miss_count.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    pub fn put(&self, key: Query, output: QueryOutput) {
        self.cache.lock().put(key, output);
    }

    /// Returns the cached output or computes and stores it.
    ///
    /// The lock is not held while `compute` runs, so two threads may compute
    /// the same query once each.
    pub fn get_or_insert_with(&self, key: &Query, compute: impl FnOnce() -> QueryOutput) -> QueryOutput {
        if let Some(output) = self.get(key) {
            return output;
        }
        let output = compute();
        self.put(key.clone(), output.clone());
        output
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hit_count: self.hit_count.load(Ordering::Relaxed),
            miss_count: self.miss_count.load(Ordering::Relaxed),
            size: self.cache.lock().len(),
            capacity: self.size_limit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hit_count: usize,
    pub miss_count: usize,
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}
