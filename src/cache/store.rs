//! Cache Store Module
//!
//! Main cache engine combining HashMap lookup with an LRU list and TTL expiration.
//!
//! The map stores a handle into the list for every key, so promotion and removal
//! never scan the recency order. Both structures are updated together by every
//! operation and always hold the same set of keys.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use chrono::Duration;
use tracing::{debug, trace};

use crate::cache::clock::expiration_from;
use crate::cache::lru::{Handle, LruList};
use crate::cache::{CacheStats, Clock, Entry, SystemClock};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cache ==
/// Bounded key-value cache with LRU eviction and per-entry TTL.
///
/// Expired entries are dropped lazily when [`Cache::get`] touches them and in bulk by
/// [`Cache::clear_expired`]. Nothing runs in the background.
///
/// # Examples
/// ```
/// use chrono::Duration;
/// use lru_ttl_cache::Cache;
///
/// let mut cache = Cache::new(2).unwrap();
/// cache.add("a", 1, Duration::zero());
/// cache.add("b", 2, Duration::zero());
///
/// assert_eq!(cache.get("a"), Some(&1));
///
/// // "b" is now least recently used and makes room for "c"
/// cache.add("c", 3, Duration::zero());
/// assert!(!cache.contains("b"));
/// assert_eq!(cache.keys(), vec!["c", "a"]);
/// ```
pub struct Cache<K, V, C = SystemClock> {
    /// Key to list handle lookup
    index: HashMap<K, Handle>,
    /// Recency order, front = most recently used
    order: LruList<K, V>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL applied by `put`, zero = never expires
    default_ttl: Duration,
    /// Source of "now" for expiration
    clock: C,
}

impl<K, V, C: Clock> fmt::Debug for Cache<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("capacity", &self.capacity)
            .field("len", &self.order.len())
            .field("default_ttl", &self.default_ttl)
            .field("stats", &self.stats)
            .field("clock", &self.clock)
            .finish()
    }
}

impl<K: Hash + Eq + Clone, V> Cache<K, V, SystemClock> {
    // == Constructor ==
    /// Creates an empty cache that holds at most `capacity` entries.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_clock(capacity, SystemClock)
    }

    /// Creates an empty cache from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.capacity)?.with_default_ttl(config.default_ttl()))
    }
}

impl<K: Hash + Eq + Clone, V, C: Clock> Cache<K, V, C> {
    /// Creates an empty cache that reads the current time from `clock`.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn with_clock(capacity: usize, clock: C) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            index: HashMap::new(),
            order: LruList::new(),
            stats: CacheStats::new(),
            capacity,
            default_ttl: Duration::zero(),
            clock,
        })
    }

    /// Sets the TTL used by [`Cache::put`].
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Returns the TTL used by [`Cache::put`].
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the clock the cache evaluates expiration against.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    // == Add ==
    /// Inserts or overwrites the entry for `key`.
    ///
    /// A zero `ttl` stores the entry without expiration; any other value expires it at
    /// `now + ttl`, so a negative TTL stores an entry that is already expired.
    /// Overwriting updates value and expiration and marks the entry most recently used.
    /// A new key arriving at full capacity evicts the least recently used entry, which
    /// is returned.
    pub fn add(&mut self, key: K, value: V, ttl: Duration) -> Option<(K, V)> {
        let expires_at = expiration_from(self.clock.now(), ttl);

        if let Some(&handle) = self.index.get(&key) {
            let entry = self.order.get_mut(handle);
            entry.value = value;
            entry.expires_at = expires_at;
            self.order.move_to_front(handle);
            return None;
        }

        let evicted = if self.order.len() >= self.capacity {
            let evicted = self.evict_oldest();
            if evicted.is_some() {
                debug!(capacity = self.capacity, "Evicted least recently used entry");
            }
            evicted
        } else {
            None
        };

        let handle = self
            .order
            .push_front(Entry::new(key.clone(), value, expires_at));
        self.index.insert(key, handle);

        evicted
    }

    // == Put ==
    /// Inserts or overwrites `key` using the cache's default TTL.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        let ttl = self.default_ttl;
        self.add(key, value, ttl)
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// Returns None if the key is absent or expired. An expired entry is removed as a
    /// side effect.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(&handle) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if self.order.get(handle).is_expired_at(self.clock.now()) {
            self.detach(handle);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            trace!("Dropped expired entry on read");
            return None;
        }

        self.order.move_to_front(handle);
        self.stats.record_hit();
        Some(self.order.get(handle).value())
    }

    // == Peek ==
    /// Returns the value for `key` if it is physically stored.
    ///
    /// Neither recency nor expiration is touched: an expired entry that has not been
    /// swept is still returned.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.peek_entry(key).map(Entry::value)
    }

    /// Returns the full entry for `key` without promoting it.
    pub fn peek_entry<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&handle| self.order.get(handle))
    }

    // == Contains ==
    /// Reports whether `key` is physically stored, expired or not.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Is Expired ==
    /// Reports whether the entry for `key` has expired by the cache's clock.
    ///
    /// Returns None if the key is not stored. Nothing is removed or promoted.
    pub fn is_expired<Q>(&self, key: &Q) -> Option<bool>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.peek_entry(key)
            .map(|entry| entry.is_expired_at(self.clock.now()))
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was stored.
    ///
    /// Removing a missing key from a non-empty cache is a no-op.
    ///
    /// # Errors
    /// Returns [`CacheError::EmptyCache`] when the cache holds no entries.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.order.is_empty() {
            return Err(CacheError::EmptyCache);
        }

        Ok(self
            .index
            .remove(key)
            .map(|handle| self.order.remove(handle).value))
    }

    // == Remove Oldest ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if the cache is empty.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        self.evict_oldest()
    }

    // == Clear Expired ==
    /// Removes every expired entry and returns how many were dropped.
    ///
    /// Surviving entries keep their relative order.
    pub fn clear_expired(&mut self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;

        let mut cursor = self.order.back();
        while let Some(handle) = cursor {
            cursor = self.order.prev(handle);
            if self.order.get(handle).is_expired_at(now) {
                self.detach(handle);
                removed += 1;
            }
        }

        if removed > 0 {
            self.stats.record_expirations(removed);
            debug!(removed, remaining = self.order.len(), "Cleared expired entries");
        } else {
            trace!("No expired entries found");
        }

        removed
    }

    // == Replace ==
    /// Swaps the value stored for `key`, returning the previous one.
    ///
    /// Expiration and recency are left untouched.
    ///
    /// # Errors
    /// Returns [`CacheError::KeyNotFound`] if the key is not stored.
    pub fn replace<Q>(&mut self, key: &Q, value: V) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.handle_of(key)?;
        Ok(std::mem::replace(&mut self.order.get_mut(handle).value, value))
    }

    // == Update Value ==
    /// Sets a new value for `key`, keeps its expiration and marks it most recently used.
    ///
    /// # Errors
    /// Returns [`CacheError::KeyNotFound`] if the key is not stored.
    pub fn update_val<Q>(&mut self, key: &Q, value: V) -> Result<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.handle_of(key)?;
        self.order.get_mut(handle).value = value;
        self.order.move_to_front(handle);
        Ok(self.order.get(handle))
    }

    // == Update Expiration ==
    /// Restarts the TTL of `key` from now, keeps its value and marks it most recently
    /// used. A zero `ttl` makes the entry permanent.
    ///
    /// # Errors
    /// Returns [`CacheError::KeyNotFound`] if the key is not stored.
    pub fn update_expiration<Q>(&mut self, key: &Q, ttl: Duration) -> Result<&Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.handle_of(key)?;
        self.order.get_mut(handle).expires_at = expiration_from(self.clock.now(), ttl);
        self.order.move_to_front(handle);
        Ok(self.order.get(handle))
    }

    // == Resize ==
    /// Changes the capacity, evicting least recently used entries that no longer fit.
    ///
    /// Returns the number of evicted entries; growing never evicts.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is zero. The cache is
    /// left unchanged in that case.
    pub fn resize(&mut self, capacity: usize) -> Result<usize> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        self.capacity = capacity;

        let mut evicted = 0;
        while self.order.len() > capacity && self.evict_oldest().is_some() {
            evicted += 1;
        }

        if evicted > 0 {
            debug!(evicted, capacity, "Resize evicted entries");
        }

        Ok(evicted)
    }

    // == Clear ==
    /// Drops every entry. The capacity is unchanged.
    pub fn clear(&mut self) {
        let dropped = self.order.len();
        self.index.clear();
        self.order.clear();
        debug!(dropped, "Cleared cache");
    }

    // == Keys ==
    /// Returns all stored keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.order.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Iterates stored key-value pairs from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.order.iter().map(|entry| (&entry.key, &entry.value))
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Capacity ==
    /// Returns the maximum number of entries.
    pub fn cap(&self) -> usize {
        self.capacity
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.order.len());
        stats
    }

    /// Zeroes all counters.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::new();
    }

    fn handle_of<Q>(&self, key: &Q) -> Result<Handle>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied().ok_or(CacheError::KeyNotFound)
    }

    /// Unlinks a node and drops its key from the index.
    fn detach(&mut self, handle: Handle) -> Entry<K, V> {
        let entry = self.order.remove(handle);
        self.index.remove(&entry.key);
        entry
    }

    fn evict_oldest(&mut self) -> Option<(K, V)> {
        let entry = self.order.pop_back()?;
        self.index.remove(&entry.key);
        self.stats.record_evictions(1);
        Some(entry.into_parts())
    }
}
