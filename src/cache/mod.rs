//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.
//!
//! The recency list behind [`Cache`] and its node handles stay internal:
//!
//! ```compile_fail
//! use lru_ttl_cache::cache::Handle;
//! ```

mod clock;
mod entry;
mod lru;
mod shared;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::Entry;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::Cache;
