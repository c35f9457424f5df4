//! TTL Cache Module
//!
//! Expiring key/value store shared by every network-facing component.
//!
//! Eviction is purely time-based and lazy: a stale entry is removed the next
//! time its key is read, never by a background sweep. There is no size bound,
//! so keys that are written once and never read again stay resident until
//! [`TtlCache::clear`]. Volumes in a single client session are small enough
//! for that to be acceptable.

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;

use crate::cache::{current_timestamp_ms, CacheEntry, CacheStats};

// == TTL Cache ==
/// Key/value store where every entry lives for the same fixed duration.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Lifetime of every entry in milliseconds
    ttl_ms: u64,
    /// Lookup statistics
    stats: CacheStats,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl_ms: ttl.as_millis() as u64,
            stats: CacheStats::new(),
        }
    }

    /// Lifetime applied to every entry.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    // == Set ==
    /// Stores a value under `key` with the current timestamp.
    ///
    /// Any prior entry is overwritten and its age reset; the last write wins.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), CacheEntry::new(value));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns a clone of the live value stored under `key`.
    ///
    /// A stale entry is evicted as a side effect and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, current_timestamp_ms())
    }

    /// Same as [`TtlCache::get`] with an explicit clock reading.
    pub fn get_at(&mut self, key: &str, now_ms: u64) -> Option<V> {
        let stale = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_stale_at(now_ms, self.ttl_ms),
        };

        if stale {
            self.entries.remove(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        self.stats.record_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Remove ==
    /// Drops the entry for `key`, returning whether one existed.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    /// Drops every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn remove_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        self.stats.set_total_entries(self.entries.len());
        before - self.entries.len()
    }

    // == Clear ==
    /// Empties the cache. Statistics counters are kept.
    pub fn clear(&mut self) {
        debug!(stats = %self.stats(), "clearing cache");
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of stored entries, stale ones included until they are read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry (live or not yet evicted) exists for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}
