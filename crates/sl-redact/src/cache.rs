//! Concurrent key → bool cache backing the classifier.
//!
//! Each cache carries a generation counter. Clearing bumps the generation,
//! and a write-back computed against an older generation is dropped, so a
//! result derived from a replaced pattern set can never be reinserted after
//! the clear.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
struct Entries {
    generation: u64,
    map: HashMap<String, bool>,
}

/// Reader/writer-locked classification cache for one category.
#[derive(Debug, Default)]
pub struct ClassificationCache {
    entries: RwLock<Entries>,
}

impl ClassificationCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key exactly as given. Takes the shared lock only.
    pub fn get(&self, key: &str) -> Option<bool> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.map.get(key).copied()
    }

    /// Current generation; read this before computing a value to insert.
    pub fn generation(&self) -> u64 {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    /// Store a result computed during `generation`.
    ///
    /// Returns false when the cache was cleared in the meantime and the
    /// value was discarded. Concurrent inserts of the same key are harmless:
    /// the value is deterministic and the last write wins.
    pub fn insert(&self, key: &str, value: bool, generation: u64) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.generation != generation {
            return false;
        }
        entries.map.insert(key.to_string(), value);
        true
    }

    /// Drop all entries and start a new generation.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.map.clear();
        entries.generation = entries.generation.wrapping_add(1);
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .map
            .len()
    }

    /// Whether the cache holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
