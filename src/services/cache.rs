//! TTL'd caching for read queries
//!
//! Worker and report reads are cached for tens of seconds and invalidated
//! immediately after any write that could change the underlying rows.

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Cached query result with its capture time
#[derive(Debug, Clone)]
struct CachedEntry<V> {
    value: V,
    cached_at: Instant,
}

impl<V> CachedEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            cached_at: Instant::now(),
        }
    }

    /// Check if this entry is still valid given TTL
    fn is_valid(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() < ttl
    }
}

/// LRU cache of query results keyed by query identity, with per-entry TTL
pub struct QueryCache<K: Hash + Eq, V: Clone> {
    cache: RwLock<LruCache<K, CachedEntry<V>>>,
    ttl: Duration,
}

impl<K: Hash + Eq, V: Clone> QueryCache<K, V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("non-zero capacity");
        Self {
            cache: RwLock::new(LruCache::new(capacity)),
            ttl,
        }
    }

    /// Get a cached result if present and not expired
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.cache.write().ok()?;
        match cache.get(key) {
            Some(entry) if entry.is_valid(self.ttl) => Some(entry.value.clone()),
            Some(_) => {
                cache.pop(key);
                None
            }
            None => None,
        }
    }

    /// Cache a result
    pub fn insert(&self, key: K, value: V) {
        if let Ok(mut cache) = self.cache.write() {
            cache.put(key, CachedEntry::new(value));
        }
    }

    /// Drop every cached entry; called after writes
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }
}
