//! Cache Module
//!
//! Provides the in-memory TTL cache behind every cached API call.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use stats::CacheStats;
pub use store::TtlCache;

/// Cache of decoded API responses, shared by all components of a context.
pub type SharedCache = Arc<RwLock<TtlCache<serde_json::Value>>>;

/// Creates an empty shared response cache.
pub fn shared_cache(ttl: Duration) -> SharedCache {
    Arc::new(RwLock::new(TtlCache::new(ttl)))
}
