//! Shared Cache Module
//!
//! Clone-able handle that serializes access to a [`Cache`] for concurrent owners.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::{Mutex, MutexGuard};

use crate::cache::{Cache, CacheStats, Clock, Entry, SystemClock};
use crate::error::Result;

// == Shared Cache ==
/// Thread-safe handle to a cache.
///
/// Every operation takes the same lock, reads included, because promoting reads
/// reorder the recency list. Values handed out are clones taken under the lock.
/// The handle never spawns tasks: expired entries are only swept when a caller
/// invokes [`SharedCache::clear_expired`].
pub struct SharedCache<K, V, C = SystemClock> {
    inner: Arc<Mutex<Cache<K, V, C>>>,
}

impl<K, V, C> Clone for SharedCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, C> fmt::Debug for SharedCache<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCache").finish_non_exhaustive()
    }
}

impl<K: Hash + Eq + Clone, V, C: Clock> From<Cache<K, V, C>> for SharedCache<K, V, C> {
    fn from(cache: Cache<K, V, C>) -> Self {
        Self::new(cache)
    }
}

impl<K: Hash + Eq + Clone, V, C: Clock> SharedCache<K, V, C> {
    /// Wraps a cache for shared use.
    pub fn new(cache: Cache<K, V, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Locks the cache for a batch of operations.
    pub async fn lock(&self) -> MutexGuard<'_, Cache<K, V, C>> {
        self.inner.lock().await
    }

    /// See [`Cache::add`].
    pub async fn add(&self, key: K, value: V, ttl: Duration) -> Option<(K, V)> {
        self.inner.lock().await.add(key, value, ttl)
    }

    /// See [`Cache::put`].
    pub async fn put(&self, key: K, value: V) -> Option<(K, V)> {
        self.inner.lock().await.put(key, value)
    }

    /// See [`Cache::get`]. Returns a clone of the value.
    pub async fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().await.get(key).cloned()
    }

    /// See [`Cache::peek`]. Returns a clone of the value.
    pub async fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().await.peek(key).cloned()
    }

    /// See [`Cache::contains`].
    pub async fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().await.contains(key)
    }

    /// See [`Cache::is_expired`].
    pub async fn is_expired<Q>(&self, key: &Q) -> Option<bool>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().await.is_expired(key)
    }

    /// See [`Cache::remove`].
    pub async fn remove<Q>(&self, key: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().await.remove(key)
    }

    /// See [`Cache::remove_oldest`].
    pub async fn remove_oldest(&self) -> Option<(K, V)> {
        self.inner.lock().await.remove_oldest()
    }

    /// See [`Cache::replace`].
    pub async fn replace<Q>(&self, key: &Q, value: V) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().await.replace(key, value)
    }

    /// See [`Cache::update_val`]. Returns a snapshot of the updated entry.
    pub async fn update_val<Q>(&self, key: &Q, value: V) -> Result<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner
            .lock()
            .await
            .update_val(key, value)
            .cloned()
    }

    /// See [`Cache::update_expiration`]. Returns a snapshot of the updated entry.
    pub async fn update_expiration<Q>(&self, key: &Q, ttl: Duration) -> Result<Entry<K, V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner
            .lock()
            .await
            .update_expiration(key, ttl)
            .cloned()
    }

    /// See [`Cache::resize`].
    pub async fn resize(&self, capacity: usize) -> Result<usize> {
        self.inner.lock().await.resize(capacity)
    }

    /// See [`Cache::clear`].
    pub async fn clear(&self) {
        self.inner.lock().await.clear()
    }

    /// See [`Cache::clear_expired`].
    pub async fn clear_expired(&self) -> usize {
        self.inner.lock().await.clear_expired()
    }

    /// See [`Cache::keys`].
    pub async fn keys(&self) -> Vec<K> {
        self.inner.lock().await.keys()
    }

    /// See [`Cache::len`].
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// See [`Cache::is_empty`].
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// See [`Cache::cap`].
    pub async fn cap(&self) -> usize {
        self.inner.lock().await.cap()
    }

    /// See [`Cache::stats`].
    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }
}
