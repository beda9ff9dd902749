//! Stampede Cache - A bounded, thread-safe cache in front of a slow store
//!
//! Provides interchangeable concurrency strategies behind one cache contract,
//! with a hard cap on cached entries and FIFO eviction.

pub mod bench;
pub mod cache;
pub mod config;
pub mod error;
pub mod store;

pub use cache::{BoundedCache, Cache, CacheEntry, CacheStats};
pub use config::{BenchConfig, CacheConfig, Strategy};
pub use error::{CacheError, Result, StoreError};
pub use store::{BackingStore, SharedStore, SynchronizedStore};
