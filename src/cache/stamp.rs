//! Version Stamp Module
//!
//! Validates optimistic reads of a mapping against concurrent writers.
//!
//! The version is even while no writer is inside a write section and odd
//! while one is. A reader records an even version, reads, then checks the
//! version is unchanged.

use std::sync::atomic::{fence, AtomicU64, Ordering};

use parking_lot::RwLockWriteGuard;

// == Stamp ==
/// Monotonic version counter guarding a mapping.
#[derive(Debug, Default)]
pub struct Stamp {
    version: AtomicU64,
}

impl Stamp {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Try Optimistic Read ==
    /// Returns a stamp to validate later, or None while a writer is active.
    pub fn try_optimistic_read(&self) -> Option<u64> {
        let version = self.version.load(Ordering::Acquire);
        (version & 1 == 0).then_some(version)
    }

    // == Validate ==
    /// Returns true if no write section started since `stamp` was taken.
    pub fn validate(&self, stamp: u64) -> bool {
        fence(Ordering::Acquire);
        self.version.load(Ordering::Relaxed) == stamp
    }

    // == Write ==
    /// Opens a write section that closes when the returned guard drops.
    ///
    /// Requires the mapping's exclusive lock so write sections never overlap.
    pub fn write<'a, T>(&'a self, _exclusive: &RwLockWriteGuard<'_, T>) -> StampWriteGuard<'a> {
        self.version.fetch_add(1, Ordering::AcqRel);
        StampWriteGuard { stamp: self }
    }

    // == Version ==
    #[cfg(test)]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

// == Stamp Write Guard ==
/// Open write section on a [`Stamp`].
#[derive(Debug)]
pub struct StampWriteGuard<'a> {
    stamp: &'a Stamp,
}

impl Drop for StampWriteGuard<'_> {
    fn drop(&mut self) {
        self.stamp.version.fetch_add(1, Ordering::Release);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::RwLock;

    #[test]
    fn test_stamp_valid_without_writes() {
        let stamp = Stamp::new();
        let s = stamp.try_optimistic_read().unwrap();
        assert!(stamp.validate(s));
    }

    #[test]
    fn test_stamp_invalidated_by_write() {
        let lock = RwLock::new(());
        let stamp = Stamp::new();
        let s = stamp.try_optimistic_read().unwrap();

        {
            let guard = lock.write();
            let _section = stamp.write(&guard);
        }

        assert!(!stamp.validate(s));
        assert_eq!(stamp.version(), 2);
    }

    #[test]
    fn test_stamp_unavailable_during_write() {
        let lock = RwLock::new(());
        let stamp = Stamp::new();

        let guard = lock.write();
        let section = stamp.write(&guard);
        assert!(stamp.try_optimistic_read().is_none());

        drop(section);
        assert!(stamp.try_optimistic_read().is_some());
    }
}
