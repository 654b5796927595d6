//! In-memory resolution cache.
//!
//! A memoization table: entries are never evicted or recomputed once present.
//! The dirty counter tracks how many entries were computed during this run so
//! the owner can skip persistence when nothing changed.

use std::collections::BTreeMap;

use crate::error::ClasspathResult;
use crate::types::ResolvedPath;

/// Identifier to resolution outcome, ordered by identifier.
pub type CacheMap = BTreeMap<String, ResolvedPath>;

#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    entries: CacheMap,
    added: usize,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure read.
    pub fn lookup(&self, identifier: &str) -> Option<&ResolvedPath> {
        self.entries.get(identifier)
    }

    /// Insert a freshly computed outcome.
    ///
    /// Returns the value now stored for `identifier`. An existing entry is
    /// kept as is and does not count as new.
    pub fn record(&mut self, identifier: &str, resolved: ResolvedPath) -> ResolvedPath {
        if let Some(existing) = self.entries.get(identifier) {
            return existing.clone();
        }
        self.entries.insert(identifier.to_string(), resolved.clone());
        self.added += 1;
        resolved
    }

    /// Replace every entry, e.g. when hydrating from the persisted artifact.
    /// The dirty counter is left alone.
    pub fn replace_all(&mut self, entries: CacheMap) {
        self.entries = entries;
    }

    /// Entries computed since this cache was created.
    pub fn added_count(&self) -> usize {
        self.added
    }

    pub fn is_dirty(&self) -> bool {
        self.added > 0
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in lexicographic identifier order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ResolvedPath)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy of the current entries.
    pub fn snapshot(&self) -> CacheMap {
        self.entries.clone()
    }

    /// Deterministic YAML rendering of the entries.
    ///
    /// Identical logical contents always produce identical bytes.
    pub fn serialize(&self) -> ClasspathResult<String> {
        serialize_entries(&self.entries)
    }
}

pub(crate) fn serialize_entries(entries: &CacheMap) -> ClasspathResult<String> {
    Ok(serde_yaml::to_string(entries)?)
}
