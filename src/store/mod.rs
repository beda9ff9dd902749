//! Backing Store Module
//!
//! The slow, authoritative key-value source that caches sit in front of.
//!
//! Two flavours of the same contract exist:
//! - [`BackingStore`] takes `&mut self` and makes no thread-safety promise
//! - [`SharedStore`] takes `&self` and may be called from many threads
//!
//! [`SynchronizedStore`] turns the former into the latter by serializing
//! every call behind one mutex.

mod fake;
mod memory;
mod synchronized;

use std::sync::Arc;

use crate::error::StoreResult;

pub use fake::FakeStore;
pub use memory::MemoryStore;
pub use synchronized::SynchronizedStore;

// == Backing Store ==
/// A key-value provider that must not be called concurrently.
pub trait BackingStore: Send {
    /// Stores `value` under `key`.
    fn put(&mut self, key: &str, value: String) -> StoreResult<()>;

    /// Fetches the value stored under `key`.
    ///
    /// Absent-key behaviour is store-defined: any `Ok` is authoritative.
    fn get(&mut self, key: &str) -> StoreResult<String>;
}

// == Shared Store ==
/// A key-value provider that is safe to call from many threads.
pub trait SharedStore: Send + Sync {
    /// Stores `value` under `key`.
    fn put(&self, key: &str, value: String) -> StoreResult<()>;

    /// Fetches the value stored under `key`.
    fn get(&self, key: &str) -> StoreResult<String>;
}

impl<T: SharedStore + ?Sized> SharedStore for Arc<T> {
    fn put(&self, key: &str, value: String) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn get(&self, key: &str) -> StoreResult<String> {
        (**self).get(key)
    }
}

// == Store Latency ==
/// Simulated latency of a remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency {
    /// Delay applied to every write
    pub write: std::time::Duration,
    /// Delay applied to every read
    pub read: std::time::Duration,
}

impl Latency {
    /// No artificial delay.
    pub const NONE: Latency = Latency {
        write: std::time::Duration::ZERO,
        read: std::time::Duration::ZERO,
    };

    /// 1 ms per write and 5 ms per read, roughly a remote cache over a LAN.
    pub const REMOTE: Latency = Latency {
        write: std::time::Duration::from_millis(1),
        read: std::time::Duration::from_millis(5),
    };

    /// Picks [`Latency::REMOTE`] when `simulate` is set, otherwise [`Latency::NONE`].
    pub fn simulated(simulate: bool) -> Self {
        if simulate {
            Self::REMOTE
        } else {
            Self::NONE
        }
    }

    pub(crate) fn before_write(&self) {
        if !self.write.is_zero() {
            std::thread::sleep(self.write);
        }
    }

    pub(crate) fn before_read(&self) {
        if !self.read.is_zero() {
            std::thread::sleep(self.read);
        }
    }
}
