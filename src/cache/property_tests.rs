//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple reference model and to verify
//! the ordering, capacity and expiration properties of the engine.

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;
use std::collections::HashSet;

use crate::cache::{Cache, ManualClock};
use crate::error::CacheError;

// == Test Configuration ==
const TEST_CAPACITY: usize = 100;

// == Strategies ==
/// Generates valid cache keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,16}".prop_map(|s| s)
}

/// Generates cache values
fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}".prop_map(|s| s)
}

/// Keys drawn from a tiny alphabet so operations keep colliding
fn colliding_key_strategy() -> impl Strategy<Value = String> {
    "[a-f]".prop_map(|s| s)
}

/// TTL in whole seconds, 0 = never expires, negative = already expired
fn ttl_strategy() -> impl Strategy<Value = i64> {
    -2i64..=3
}

fn unique(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}

fn test_cache(capacity: usize) -> (Cache<String, u32, ManualClock>, ManualClock) {
    let clock = ManualClock::new(DateTime::<Utc>::UNIX_EPOCH);
    let cache = Cache::with_clock(capacity, clock.clone()).unwrap();
    (cache, clock)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Add { key: String, value: u32, ttl: i64 },
    Get { key: String },
    Peek { key: String },
    Remove { key: String },
    RemoveOldest,
    Replace { key: String, value: u32 },
    UpdateVal { key: String, value: u32 },
    UpdateExpiration { key: String, ttl: i64 },
    Resize { capacity: usize },
    ClearExpired,
    Advance { secs: i64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (colliding_key_strategy(), any::<u32>(), ttl_strategy())
            .prop_map(|(key, value, ttl)| CacheOp::Add { key, value, ttl }),
        2 => colliding_key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => colliding_key_strategy().prop_map(|key| CacheOp::Peek { key }),
        1 => colliding_key_strategy().prop_map(|key| CacheOp::Remove { key }),
        1 => Just(CacheOp::RemoveOldest),
        1 => (colliding_key_strategy(), any::<u32>())
            .prop_map(|(key, value)| CacheOp::Replace { key, value }),
        1 => (colliding_key_strategy(), any::<u32>())
            .prop_map(|(key, value)| CacheOp::UpdateVal { key, value }),
        1 => (colliding_key_strategy(), ttl_strategy())
            .prop_map(|(key, ttl)| CacheOp::UpdateExpiration { key, ttl }),
        1 => (1usize..6).prop_map(|capacity| CacheOp::Resize { capacity }),
        1 => Just(CacheOp::ClearExpired),
        1 => (0i64..3).prop_map(|secs| CacheOp::Advance { secs }),
    ]
}

// == Reference Model ==
/// Naive vector-backed cache, front = most recently used.
struct Model {
    entries: Vec<(String, u32, Option<i64>)>,
    capacity: usize,
    now: i64,
}

impl Model {
    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _, _)| k == key)
    }

    fn expires(&self, ttl: i64) -> Option<i64> {
        (ttl != 0).then_some(self.now + ttl)
    }

    fn is_expired(&self, idx: usize) -> bool {
        self.entries[idx].2.is_some_and(|t| t <= self.now)
    }

    fn promote(&mut self, idx: usize) {
        let entry = self.entries.remove(idx);
        self.entries.insert(0, entry);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _, _)| k.clone()).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Every operation agrees with the reference model on its result and on the
    // resulting MRU to LRU key order.
    #[test]
    fn prop_matches_reference_model(
        initial_capacity in 1usize..6,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let (mut cache, clock) = test_cache(initial_capacity);
        let mut model = Model { entries: Vec::new(), capacity: initial_capacity, now: 0 };

        for op in ops {
            match op {
                CacheOp::Add { key, value, ttl } => {
                    let expires = model.expires(ttl);
                    match model.position(&key) {
                        Some(idx) => {
                            model.entries[idx] = (key.clone(), value, expires);
                            model.promote(idx);
                        }
                        None => {
                            if model.entries.len() >= model.capacity {
                                model.entries.pop();
                            }
                            model.entries.insert(0, (key.clone(), value, expires));
                        }
                    }
                    cache.add(key, value, Duration::seconds(ttl));
                    prop_assert!(cache.len() <= cache.cap());
                }
                CacheOp::Get { key } => {
                    let expected = match model.position(&key) {
                        Some(idx) if model.is_expired(idx) => {
                            model.entries.remove(idx);
                            None
                        }
                        Some(idx) => {
                            let value = model.entries[idx].1;
                            model.promote(idx);
                            Some(value)
                        }
                        None => None,
                    };
                    prop_assert_eq!(cache.get(&key).copied(), expected);
                }
                CacheOp::Peek { key } => {
                    let expected = model.position(&key).map(|idx| model.entries[idx].1);
                    prop_assert_eq!(cache.peek(&key).copied(), expected);
                    prop_assert_eq!(cache.contains(&key), expected.is_some());
                }
                CacheOp::Remove { key } => {
                    let expected = if model.entries.is_empty() {
                        Err(CacheError::EmptyCache)
                    } else {
                        Ok(model.position(&key).map(|idx| model.entries.remove(idx).1))
                    };
                    prop_assert_eq!(cache.remove(&key), expected);
                }
                CacheOp::RemoveOldest => {
                    let expected = model.entries.pop().map(|(k, v, _)| (k, v));
                    prop_assert_eq!(cache.remove_oldest(), expected);
                }
                CacheOp::Replace { key, value } => {
                    let expected = match model.position(&key) {
                        Some(idx) => Ok(std::mem::replace(&mut model.entries[idx].1, value)),
                        None => Err(CacheError::KeyNotFound),
                    };
                    prop_assert_eq!(cache.replace(&key, value), expected);
                }
                CacheOp::UpdateVal { key, value } => {
                    let expected = match model.position(&key) {
                        Some(idx) => {
                            model.entries[idx].1 = value;
                            model.promote(idx);
                            Ok(value)
                        }
                        None => Err(CacheError::KeyNotFound),
                    };
                    let got = cache.update_val(&key, value).map(|entry| *entry.value());
                    prop_assert_eq!(got, expected);
                }
                CacheOp::UpdateExpiration { key, ttl } => {
                    let expires = model.expires(ttl);
                    let expected = match model.position(&key) {
                        Some(idx) => {
                            model.entries[idx].2 = expires;
                            model.promote(idx);
                            Ok(model.entries[0].1)
                        }
                        None => Err(CacheError::KeyNotFound),
                    };
                    let got = cache
                        .update_expiration(&key, Duration::seconds(ttl))
                        .map(|entry| *entry.value());
                    prop_assert_eq!(got, expected);
                }
                CacheOp::Resize { capacity } => {
                    let evicted = model.entries.len().saturating_sub(capacity);
                    model.entries.truncate(capacity);
                    model.capacity = capacity;
                    prop_assert_eq!(cache.resize(capacity), Ok(evicted));
                    prop_assert!(cache.len() <= cache.cap());
                }
                CacheOp::ClearExpired => {
                    let now = model.now;
                    let before = model.entries.len();
                    model.entries.retain(|(_, _, exp)| !exp.is_some_and(|t| t <= now));
                    prop_assert_eq!(cache.clear_expired(), before - model.entries.len());
                }
                CacheOp::Advance { secs } => {
                    model.now += secs;
                    clock.advance(Duration::seconds(secs));
                }
            }

            prop_assert_eq!(cache.keys(), model.keys());
            prop_assert_eq!(cache.len(), model.entries.len());
            prop_assert_eq!(cache.cap(), model.capacity);
        }
    }

    // Storing a pair without TTL and reading it back returns the stored value.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let mut cache = Cache::new(TEST_CAPACITY).unwrap();

        cache.add(key.clone(), value.clone(), Duration::zero());

        prop_assert_eq!(cache.get(&key), Some(&value), "Round-trip value mismatch");
        prop_assert_eq!(cache.len(), 1);
    }

    // Storing V1 then V2 under one key leaves V2 and a single entry.
    #[test]
    fn prop_overwrite_semantics(
        key in valid_key_strategy(),
        value1 in valid_value_strategy(),
        value2 in valid_value_strategy()
    ) {
        let mut cache = Cache::new(TEST_CAPACITY).unwrap();

        cache.add(key.clone(), value1, Duration::zero());
        cache.add(key.clone(), value2.clone(), Duration::zero());

        prop_assert_eq!(cache.get(&key), Some(&value2), "Overwrite should return new value");
        prop_assert_eq!(cache.len(), 1, "Should have exactly one entry after overwrite");
    }

    // No sequence of inserts pushes the cache above its capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(
            (valid_key_strategy(), valid_value_strategy()),
            1..200
        )
    ) {
        let capacity = 50;
        let mut cache = Cache::new(capacity).unwrap();

        for (key, value) in entries {
            cache.add(key, value, Duration::zero());
            prop_assert!(
                cache.len() <= capacity,
                "Cache size {} exceeds max {}",
                cache.len(),
                capacity
            );
        }
    }

    // Filling the cache and adding one more key evicts the first key inserted.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(valid_key_strategy(), 2..10),
        new_key in valid_key_strategy()
    ) {
        let unique_keys = unique(initial_keys);
        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let capacity = unique_keys.len();
        let mut cache = Cache::new(capacity).unwrap();
        for key in &unique_keys {
            cache.add(key.clone(), format!("value_{}", key), Duration::zero());
        }

        let evicted = cache.add(new_key.clone(), "new".to_string(), Duration::zero());

        prop_assert_eq!(cache.len(), capacity);
        prop_assert_eq!(evicted.map(|(k, _)| k), Some(unique_keys[0].clone()));
        prop_assert!(!cache.contains(&unique_keys[0]));
        prop_assert!(cache.contains(&new_key));
        for key in unique_keys.iter().skip(1) {
            prop_assert!(cache.contains(key), "Key '{}' should still exist", key);
        }
    }

    // A promoting read keeps a key from being the next eviction candidate.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(valid_key_strategy(), 3..8),
        new_key in valid_key_strategy()
    ) {
        let unique_keys = unique(keys);
        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        let mut cache = Cache::new(unique_keys.len()).unwrap();
        for key in &unique_keys {
            cache.add(key.clone(), key.clone(), Duration::zero());
        }

        prop_assert!(cache.get(&unique_keys[0]).is_some());
        cache.add(new_key, "new".to_string(), Duration::zero());

        prop_assert!(cache.contains(&unique_keys[0]), "Accessed key must survive");
        prop_assert!(!cache.contains(&unique_keys[1]), "Next oldest key must be evicted");
    }

    // Repeated contains/peek calls never reorder keys.
    #[test]
    fn prop_contains_and_peek_are_idempotent(
        keys in prop::collection::vec(valid_key_strategy(), 1..20),
        lookups in prop::collection::vec(valid_key_strategy(), 1..20)
    ) {
        let mut cache = Cache::new(TEST_CAPACITY).unwrap();
        for key in keys.iter().chain(lookups.iter().take(3)) {
            cache.add(key.clone(), 0u8, Duration::zero());
        }

        let before = cache.keys();
        for lookup in lookups.iter().chain(keys.iter()) {
            let _ = cache.contains(lookup);
            let _ = cache.peek(lookup);
        }

        prop_assert_eq!(cache.keys(), before);
    }

    // Shrinking evicts exactly the surplus, oldest first.
    #[test]
    fn prop_resize_evicts_least_recently_used(
        keys in prop::collection::vec(valid_key_strategy(), 1..30),
        new_capacity in 1usize..40
    ) {
        let unique_keys = unique(keys);
        let mut cache = Cache::new(TEST_CAPACITY).unwrap();
        for key in &unique_keys {
            cache.add(key.clone(), (), Duration::zero());
        }

        let expected: Vec<String> = unique_keys.iter().rev().take(new_capacity).cloned().collect();
        let evicted = cache.resize(new_capacity).unwrap();

        prop_assert_eq!(evicted, unique_keys.len().saturating_sub(new_capacity));
        prop_assert_eq!(cache.cap(), new_capacity);
        prop_assert_eq!(cache.keys(), expected);
    }

    // Sweeping removes exactly the entries stored with a negative TTL and keeps
    // the survivors in their relative order.
    #[test]
    fn prop_clear_expired_keeps_survivor_order(
        entries in prop::collection::vec((valid_key_strategy(), -5i64..5), 1..30)
    ) {
        let mut seen = HashSet::new();
        let entries: Vec<(String, i64)> = entries
            .into_iter()
            .filter(|(k, _)| seen.insert(k.clone()))
            .collect();

        let (mut cache, _) = test_cache(TEST_CAPACITY);
        for (key, ttl) in &entries {
            cache.add(key.clone(), 0, Duration::seconds(*ttl));
        }

        let survivors: Vec<String> = entries
            .iter()
            .rev()
            .filter(|(_, ttl)| *ttl >= 0)
            .map(|(k, _)| k.clone())
            .collect();
        let removed = cache.clear_expired();

        prop_assert_eq!(removed, entries.len() - survivors.len());
        prop_assert_eq!(cache.keys(), survivors);
    }
}
