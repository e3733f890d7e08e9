//! Cache Store Module
//!
//! Shared lookup cache keyed by table namespace and lookup key, with lazy
//! TTL expiry.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{CacheEntry, CacheStats, CachedResult, StatsRecorder};

// == Lookup Cache ==
/// Time-bounded memo of directory answers, shared by all connections.
///
/// Uses a 2-level map (namespace -> key -> entry) so reads need no
/// allocation. Each entry is replaced whole under the write lock, so a
/// reader never sees a partially written entry. The lock is never held
/// across an `.await`; callers query the directory outside of it.
///
/// Expired entries are not purged. They read as absent and are
/// overwritten by the next `put` for the same key.
#[derive(Debug, Default)]
pub struct LookupCache {
    /// namespace -> key -> entry
    entries: RwLock<HashMap<String, HashMap<String, CacheEntry>>>,
    /// Performance statistics
    stats: StatsRecorder,
}

impl LookupCache {
    // == Constructor ==
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    // == Get ==
    /// Returns a copy of the live entry for `(namespace, key)`.
    ///
    /// An expired entry is treated exactly like a missing one.
    pub fn get(&self, namespace: &str, key: &str) -> Option<CacheEntry> {
        let now = Instant::now();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

        match entries.get(namespace).and_then(|inner| inner.get(key)) {
            Some(entry) if entry.is_expired_at(now) => {
                self.stats.record_expired();
                None
            }
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Stores `result` for `(namespace, key)`, live for `ttl`.
    ///
    /// Overwrites any previous entry, expired or not.
    pub fn put(&self, namespace: &str, key: &str, result: CachedResult, ttl: Duration) {
        let entry = CacheEntry::new(key.to_string(), result, ttl);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        entries
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), entry);
        self.stats.record_insert();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(HashMap::len)
            .sum()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
