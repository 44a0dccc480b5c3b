//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use chrono::{DateTime, Duration, Utc};

// == Cache Entry ==
/// Represents a single cache entry with its key, value and expiration.
///
/// The key is fixed once the entry is inserted. Value and expiration are only changed
/// through the cache's update operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    /// The lookup key
    pub(crate) key: K,
    /// The stored value
    pub(crate) value: V,
    /// Expiration instant, None = never expires
    pub(crate) expires_at: Option<DateTime<Utc>>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates a new entry with an already computed expiration instant.
    pub fn new(key: K, value: V, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            key,
            value,
            expires_at,
        }
    }

    /// Returns the entry's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Returns the entry's value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns the expiration instant, or None if the entry never expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Consumes the entry and returns its key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }

    // == Is Expired ==
    /// Checks if the entry has expired at the given instant.
    ///
    /// Pass the owning cache's clock reading; [`Cache::is_expired`] does this for a
    /// stored key.
    ///
    /// [`Cache::is_expired`]: crate::cache::Cache::is_expired
    ///
    /// Boundary condition: an entry is expired once `now` reaches its expiration
    /// instant, so an entry stored with a non-positive TTL is expired immediately.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => expires <= now,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining TTL at `now`, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::zero())` if the entry has expired
    /// - `Some(remaining)` if the entry has a TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.expires_at.map(|expires| {
            if expires > now {
                expires - now
            } else {
                Duration::zero()
            }
        })
    }
}
