//! Cache Entry Module
//!
//! Defines the key/value pair reported by cache snapshots.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

// == Cache Entry ==
/// A single cached key and its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheEntry {
    /// The cache key
    pub key: String,
    /// The cached value; an empty string is a present, empty value
    pub value: String,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

impl PartialOrd for CacheEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CacheEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_keys(&self.key, &other.key).then_with(|| self.value.cmp(&other.value))
    }
}

// == Utility Functions ==
/// Orders keys numerically when both parse as integers, lexicographically otherwise.
///
/// Numeric keys sort before non-numeric ones so `"2"` precedes `"10"` and `"a"`.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Renders entries as `{k1=v1, k2=v2}` after sorting them by key.
pub fn render(mut entries: Vec<CacheEntry>) -> String {
    entries.sort();
    let body: Vec<String> = entries.iter().map(ToString::to_string).collect();
    format!("{{{}}}", body.join(", "))
}
