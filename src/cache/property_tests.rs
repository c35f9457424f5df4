//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the TTL cache against a plain map model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::TtlCache;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates cache keys shaped like the ones the client builds
fn key_strategy() -> impl Strategy<Value = String> {
    "(item|prospect|quotation):[A-Z0-9-]{1,12}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Within the lifetime the cache behaves exactly like a map with
    // last-write-wins semantics.
    #[test]
    fn prop_matches_map_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = TtlCache::new(TEST_TTL);
        let mut model: HashMap<String, String> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value.clone());
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = store.get(&key);
                    prop_assert_eq!(got.as_ref(), model.get(&key), "lookup mismatch for {}", key);
                    if got.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                }
                CacheOp::Remove { key } => {
                    prop_assert_eq!(store.remove(&key), model.remove(&key).is_some());
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.expirations, 0);
        prop_assert_eq!(store.len(), model.len());
    }

    // Reading any key back right after writing it returns the written value.
    #[test]
    fn prop_get_after_set(key in key_strategy(), value in value_strategy()) {
        let mut store = TtlCache::new(TEST_TTL);

        store.set(key.clone(), value.clone());

        prop_assert_eq!(store.get(&key), Some(value));
    }

    // A stale entry is never served, whatever the clock reading past its
    // lifetime.
    #[test]
    fn prop_never_serves_stale(
        key in key_strategy(),
        value in value_strategy(),
        overshoot in 1u64..1_000_000
    ) {
        let mut store = TtlCache::new(TEST_TTL);
        store.set(key.clone(), value);
        let far = crate::cache::current_timestamp_ms() + TEST_TTL.as_millis() as u64 + overshoot;

        prop_assert!(store.get_at(&key, far).is_none());
        prop_assert!(store.is_empty());
    }
}

// Separate proptest block with fewer cases for wall-clock TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in value_strategy()) {
        let mut store = TtlCache::new(Duration::from_millis(30));

        store.set(key.clone(), value.clone());
        prop_assert_eq!(store.get(&key), Some(value), "Value should match before expiration");

        // Wait for the lifetime to pass (small buffer for timing)
        sleep(Duration::from_millis(60));

        prop_assert!(store.get(&key).is_none(), "Entry should not be found after TTL expires");
    }
}
