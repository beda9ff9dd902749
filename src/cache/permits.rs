//! Permit Pool Module
//!
//! Counts free slots in a bounded mapping.
//!
//! Invariant at quiescent points: `available() + occupied slots == capacity`.

use tokio::sync::Semaphore;

use crate::error::{CacheError, Result};

// == Permit Pool ==
/// Counting resource backed by a semaphore.
///
/// Permits are detached from their guard on acquisition and handed back
/// explicitly, because a slot outlives the call that filled it.
#[derive(Debug)]
pub struct PermitPool {
    semaphore: Semaphore,
    capacity: usize,
}

impl PermitPool {
    // == Constructor ==
    /// Creates a pool with `capacity` free permits.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 || capacity > Semaphore::MAX_PERMITS {
            return Err(CacheError::InvalidArgument(format!(
                "Permit pool capacity must be within 1..={}",
                Semaphore::MAX_PERMITS
            )));
        }
        Ok(Self {
            semaphore: Semaphore::new(capacity),
            capacity,
        })
    }

    // == Try Acquire ==
    /// Takes one permit without blocking. Returns false if none are free.
    pub fn try_acquire(&self) -> bool {
        match self.semaphore.try_acquire() {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }

    // == Release ==
    /// Returns one permit to the pool.
    ///
    /// Releasing into a full pool means a slot was freed twice.
    pub fn release(&self) -> Result<()> {
        if self.semaphore.available_permits() >= self.capacity {
            return Err(CacheError::InvariantViolation(format!(
                "Permit released into a full pool of {}",
                self.capacity
            )));
        }
        self.semaphore.add_permits(1);
        Ok(())
    }

    // == Available ==
    /// Number of free permits right now.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    // == Capacity ==
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_rejects_zero_capacity() {
        assert!(matches!(
            PermitPool::new(0),
            Err(CacheError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_pool_acquire_until_exhausted() {
        let pool = PermitPool::new(2).unwrap();

        assert!(pool.try_acquire());
        assert!(pool.try_acquire());
        assert!(!pool.try_acquire());
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.capacity(), 2);
    }

    #[test]
    fn test_pool_release_restores_permit() {
        let pool = PermitPool::new(1).unwrap();

        assert!(pool.try_acquire());
        pool.release().unwrap();
        assert_eq!(pool.available(), 1);
        assert!(pool.try_acquire());
    }

    #[test]
    fn test_pool_double_release_is_violation() {
        let pool = PermitPool::new(1).unwrap();

        let result = pool.release();
        assert!(matches!(result, Err(CacheError::InvariantViolation(_))));
        assert_eq!(pool.available(), 1);
    }
}
