//! Property-Based Tests for the Local Cache Core
//!
//! Uses proptest to verify correctness properties of the local store.

use proptest::prelude::*;

use crate::cache::LocalStore;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;
const TEST_TTL: u64 = 300;

// == Strategies ==
/// Generates valid cache keys (non-empty, within length limit)
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}".prop_map(|s| s)
}

/// Generates valid cache values (within size limit)
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,256}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
    Invalidate { pattern: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
        "[a-zA-Z0-9_]{1,8}".prop_map(|pattern| CacheOp::Invalidate { pattern }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of cache operations, the hit and miss counters
    // accurately reflect the gets that succeeded and failed, and the
    // reported size matches actual residency.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut store = LocalStore::new(TEST_MAX_ENTRIES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let _ = store.set(key, value, TEST_TTL);
                }
                CacheOp::Get { key } => {
                    match store.get(&key) {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Delete { key } => {
                    let _ = store.delete(&key);
                }
                CacheOp::Invalidate { pattern } => {
                    let _ = store.invalidate(&pattern);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.size, store.len(), "Size mismatch");
    }

    // For any valid key-value pair, storing the pair and then retrieving
    // it (before expiration) returns the exact value that was stored.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = LocalStore::new(TEST_MAX_ENTRIES);

        store.set(key.clone(), value.clone(), TEST_TTL).unwrap();

        let retrieved = store.get(&key);
        prop_assert_eq!(retrieved, Some(value), "Round-trip value mismatch");
    }

    // For any key that exists in the cache, after a delete a subsequent
    // get returns nothing.
    #[test]
    fn prop_delete_removes_entry(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut store = LocalStore::new(TEST_MAX_ENTRIES);

        store.set(key.clone(), value, TEST_TTL).unwrap();
        prop_assert!(store.get(&key).is_some(), "Key should exist before delete");

        store.delete(&key);

        prop_assert!(store.get(&key).is_none(), "Key should not exist after delete");
    }

    // For any key, storing V1 and then V2 under the same key results in
    // get returning V2.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        v1 in valid_value_strategy(),
        v2 in valid_value_strategy(),
    ) {
        let mut store = LocalStore::new(TEST_MAX_ENTRIES);

        store.set(key.clone(), v1, TEST_TTL).unwrap();
        store.set(key.clone(), v2.clone(), TEST_TTL).unwrap();

        prop_assert_eq!(store.get(&key), Some(v2), "Overwrite should win");
        prop_assert_eq!(store.len(), 1, "Overwrite should not grow the store");
    }

    // For any operation sequence, residency never exceeds capacity.
    #[test]
    fn prop_capacity_never_exceeded(ops in prop::collection::vec(cache_op_strategy(), 1..100)) {
        let max_entries = 10;
        let mut store = LocalStore::new(max_entries);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    let _ = store.set(key, value, TEST_TTL);
                }
                CacheOp::Get { key } => {
                    let _ = store.get(&key);
                }
                CacheOp::Delete { key } => {
                    let _ = store.delete(&key);
                }
                CacheOp::Invalidate { pattern } => {
                    let _ = store.invalidate(&pattern);
                }
            }
            prop_assert!(store.len() <= max_entries, "Residency exceeded capacity");
        }
    }

    // Prefix invalidation removes exactly the keys sharing the prefix.
    #[test]
    fn prop_prefix_invalidation(
        prefix in "[a-z]{2,8}",
        suffixes in prop::collection::hash_set("[a-z0-9]{1,8}", 1..10),
        other in "[A-Z]{2,8}",
    ) {
        let mut store = LocalStore::new(TEST_MAX_ENTRIES);

        for suffix in &suffixes {
            store.set(format!("{}:{}", prefix, suffix), "v".to_string(), TEST_TTL).unwrap();
        }
        store.set(other.clone(), "v".to_string(), TEST_TTL).unwrap();

        let removed = store.invalidate(&prefix);

        prop_assert_eq!(removed, suffixes.len(), "Removed count mismatch");
        for suffix in &suffixes {
            prop_assert!(store.get(&format!("{}:{}", prefix, suffix)).is_none(), "Prefixed key must be invalidated");
        }
        prop_assert!(store.get(&other).is_some(), "Unrelated key must survive");
    }
}
