//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A cached value together with the moment it was stored.
///
/// Entries carry no TTL of their own; the owning cache decides staleness
/// against its single fixed lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Storage timestamp (Unix milliseconds)
    pub stored_at: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: V) -> Self {
        Self {
            value,
            stored_at: current_timestamp_ms(),
        }
    }

    // == Age ==
    /// Milliseconds elapsed between storage and `now_ms`.
    ///
    /// Clock skew (a `now_ms` earlier than the stamp) counts as age zero.
    pub fn age_at(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.stored_at)
    }

    // == Is Stale ==
    /// Checks staleness at an explicit instant.
    ///
    /// Boundary condition: an entry exactly `ttl_ms` old is still live;
    /// it turns stale once its age strictly exceeds the lifetime.
    pub fn is_stale_at(&self, now_ms: u64, ttl_ms: u64) -> bool {
        self.age_at(now_ms) > ttl_ms
    }

    /// Checks staleness against the current clock.
    pub fn is_stale(&self, ttl_ms: u64) -> bool {
        self.is_stale_at(current_timestamp_ms(), ttl_ms)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as zero.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
