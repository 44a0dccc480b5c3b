//! LRU TTL Cache - An embeddable in-process key-value cache
//!
//! Provides bounded storage with least-recently-used eviction and optional per-entry
//! TTL expiration. Expiration is evaluated lazily on reads and swept on demand.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, CacheStats, Clock, Entry, ManualClock, SharedCache, SystemClock};
pub use config::Config;
pub use error::{CacheError, Result};
