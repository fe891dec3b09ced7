//! Identity-keyed, insertion-ordered catalog of shared entities.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A set of `Arc<T>` keyed by pointer identity.
///
/// Two structurally identical entities are distinct entries; the same `Arc`
/// inserted twice is one entry. Addresses are stable for as long as the
/// catalog holds the `Arc`, so they cannot be reused by another entity.
pub struct Catalog<T> {
    entries: Vec<Arc<T>>,
    index: HashSet<usize>,
}

impl<T> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashSet::new(),
        }
    }
}

impl<T> Catalog<T> {
    /// Returns true when the entry was not already present.
    pub fn insert(&mut self, entry: Arc<T>) -> bool {
        if !self.index.insert(address(&entry)) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Whether this exact `Arc` was inserted.
    pub fn contains(&self, entry: &Arc<T>) -> bool {
        self.index.contains(&address(entry))
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.entries.iter()
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was inserted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Catalog<T> {
    type Item = &'a Arc<T>;
    type IntoIter = std::slice::Iter<'a, Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Catalog<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

pub(crate) fn address<T>(entry: &Arc<T>) -> usize {
    Arc::as_ptr(entry) as *const () as usize
}
