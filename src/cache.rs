use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Memoizes stream-page references to the canonical stream URL they resolve to.
///
/// Entries never expire. The first value stored for a key wins, so a key
/// always maps to the same URL for the lifetime of the cache.
#[derive(Debug, Default)]
pub struct StreamCache {
    entries: Mutex<HashMap<String, String>>,
}

impl StreamCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, reference: &str) -> Option<String> {
        self.lock().get(reference).cloned()
    }

    /// Store `resolved` for `reference` unless an entry already exists, and
    /// return whichever value the cache now holds.
    pub fn insert(&self, reference: impl Into<String>, resolved: impl Into<String>) -> String {
        self.lock()
            .entry(reference.into())
            .or_insert_with(|| resolved.into())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // Entries are written whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
