//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Store Error Enum ==
/// Failure reported by a backing store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Key is absent from the store
    #[error("Key not found in store: {0}")]
    NotFound(String),

    /// Store could not serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

// == Cache Error Enum ==
/// Unified error type for the cache layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Failure propagated verbatim from the backing store
    #[error("Backing store error: {0}")]
    BackingStore(#[from] StoreError),

    /// Internal bookkeeping desync between permits, ledger and mapping
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Rejected at the boundary before any locking
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CacheError {
    /// Returns true for errors that indicate a bug in the cache itself.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CacheError::InvariantViolation(_))
    }
}

// == Result Type Aliases ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Convenience Result type for backing stores.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
