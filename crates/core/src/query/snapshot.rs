//! Snapshot capture for mutation rollback.

use super::keys::QueryKey;
use super::state::QueryState;

/// The state of a set of keys as they were before a mutation touched them.
///
/// A key that had no cache entry is recorded as `None`, so restoring the
/// snapshot removes whatever the mutation inserted for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: Vec<(QueryKey, Option<QueryState>)>,
}

impl Snapshot {
    /// Captures `keys` through `lookup`, which must not mutate the cache.
    pub fn capture<F>(keys: &[QueryKey], mut lookup: F) -> Self
    where
        F: FnMut(&QueryKey) -> Option<QueryState>,
    {
        let mut entries: Vec<(QueryKey, Option<QueryState>)> = Vec::with_capacity(keys.len());
        for key in keys {
            if entries.iter().any(|(captured, _)| captured == key) {
                continue;
            }
            entries.push((key.clone(), lookup(key)));
        }
        Self { entries }
    }

    pub fn keys(&self) -> impl Iterator<Item = &QueryKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// The captured state for `key`. `Some(None)` means the key was absent.
    pub fn get(&self, key: &QueryKey) -> Option<Option<&QueryState>> {
        self.entries
            .iter()
            .find(|(captured, _)| captured == key)
            .map(|(_, state)| state.as_ref())
    }

    pub fn entries(&self) -> &[(QueryKey, Option<QueryState>)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
