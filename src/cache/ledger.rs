//! Eviction Ledger Module
//!
//! Records cached keys in admission order so a victim can be chosen in O(1).

use std::collections::VecDeque;

// == Eviction Ledger ==
/// FIFO record of keys eligible for eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Admitted longest ago (next victim)
/// - Back = Most recently admitted
///
/// The ledger holds exactly the keys of the mapping it serves; callers keep
/// the two in lock-step.
#[derive(Debug, Default)]
pub struct EvictionLedger {
    /// Keys by admission time
    order: VecDeque<String>,
}

impl EvictionLedger {
    // == Constructor ==
    /// Creates an empty ledger sized for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
        }
    }

    // == Admit ==
    /// Records a newly admitted key.
    ///
    /// Re-admitting a cached key is the caller's bug; the ledger does not check.
    pub fn admit(&mut self, key: String) {
        self.order.push_back(key);
    }

    // == Pop Victim ==
    /// Returns and removes the key admitted longest ago.
    ///
    /// Returns None if the ledger is empty.
    pub fn pop_victim(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek Victim ==
    /// Returns the next victim without removing it.
    #[cfg(test)]
    pub fn peek_victim(&self) -> Option<&String> {
        self.order.front()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked. Linear.
    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_new() {
        let ledger = EvictionLedger::with_capacity(4);
        assert!(ledger.is_empty());
        assert_eq!(ledger.len(), 0);
        assert_eq!(ledger.peek_victim(), None);
    }

    #[test]
    fn test_ledger_fifo_order() {
        let mut ledger = EvictionLedger::default();

        ledger.admit("a".to_string());
        ledger.admit("b".to_string());
        ledger.admit("c".to_string());

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.peek_victim(), Some(&"a".to_string()));
        assert_eq!(ledger.pop_victim(), Some("a".to_string()));
        assert_eq!(ledger.pop_victim(), Some("b".to_string()));
        assert_eq!(ledger.pop_victim(), Some("c".to_string()));
        assert_eq!(ledger.pop_victim(), None);
    }

    #[test]
    fn test_ledger_contains() {
        let mut ledger = EvictionLedger::default();
        ledger.admit("key1".to_string());

        assert!(ledger.contains("key1"));
        assert!(!ledger.contains("key2"));

        ledger.pop_victim();
        assert!(!ledger.contains("key1"));
    }

    #[test]
    fn test_ledger_interleaved_admit_and_pop() {
        let mut ledger = EvictionLedger::with_capacity(2);

        ledger.admit("a".to_string());
        ledger.admit("b".to_string());
        assert_eq!(ledger.pop_victim(), Some("a".to_string()));

        ledger.admit("c".to_string());
        // 'b' is now the oldest admission
        assert_eq!(ledger.peek_victim(), Some(&"b".to_string()));
        assert_eq!(ledger.len(), 2);
    }
}
