//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
///
/// Every variant is a caller precondition violation. A failed operation leaves the
/// cache exactly as it was before the call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity requested at construction or resize is not positive
    #[error("Invalid capacity: {0}, capacity must be greater than zero")]
    InvalidCapacity(usize),

    /// Removal requested on a cache holding no entries
    #[error("Cache is empty")]
    EmptyCache,

    /// Update or replace targeted a key that is not stored
    #[error("Key not found")]
    KeyNotFound,
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
