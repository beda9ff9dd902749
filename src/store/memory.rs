//! Memory Store
//!
//! A plain `HashMap` store. Reads of absent keys fail with `NotFound`.

use std::collections::HashMap;

use crate::error::{StoreError, StoreResult};
use crate::store::BackingStore;

// == Memory Store ==
/// Unbounded in-memory store, not thread-safe.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    reads: u64,
    writes: u64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of `get` calls served, including failed ones.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Number of `put` calls accepted.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl BackingStore for MemoryStore {
    fn put(&mut self, key: &str, value: String) -> StoreResult<()> {
        self.writes += 1;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn get(&mut self, key: &str) -> StoreResult<String> {
        self.reads += 1;
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}
