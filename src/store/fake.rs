//! Fake Store
//!
//! A stand-in for a remote cache server: every key exists and maps to
//! `"fake-" + key`. Writes are accepted and dropped.

use crate::error::StoreResult;
use crate::store::{BackingStore, Latency};

/// Prefix of every value served by [`FakeStore`].
pub const FAKE_PREFIX: &str = "fake-";

// == Fake Store ==
/// Store whose reads are derived from the key.
#[derive(Debug, Default)]
pub struct FakeStore {
    latency: Latency,
    reads: u64,
    writes: u64,
}

impl FakeStore {
    /// Creates a store without artificial delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that sleeps for `latency` on every call.
    pub fn with_latency(latency: Latency) -> Self {
        Self {
            latency,
            ..Self::default()
        }
    }

    /// Number of `get` calls served.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Number of `put` calls accepted.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl BackingStore for FakeStore {
    fn put(&mut self, _key: &str, _value: String) -> StoreResult<()> {
        self.latency.before_write();
        self.writes += 1;
        Ok(())
    }

    fn get(&mut self, key: &str) -> StoreResult<String> {
        self.latency.before_read();
        self.reads += 1;
        Ok(format!("{}{}", FAKE_PREFIX, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_store_derives_value() {
        let mut store = FakeStore::new();
        assert_eq!(store.get("42").unwrap(), "fake-42");
        assert_eq!(store.get("").unwrap(), "fake-");
        assert_eq!(store.reads(), 2);
    }

    #[test]
    fn test_fake_store_ignores_writes() {
        let mut store = FakeStore::new();
        store.put("a", "value".to_string()).unwrap();
        assert_eq!(store.get("a").unwrap(), "fake-a");
        assert_eq!(store.writes(), 1);
    }
}
