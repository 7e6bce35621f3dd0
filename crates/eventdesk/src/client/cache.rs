//! Cache storage behind the query client's lock.
//!
//! Everything here is synchronous. The client takes the lock, calls one of
//! these methods, and releases it before awaiting the store.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

use eventdesk_core::query::{pattern_matches, FetchClock, QueryData, QueryKey, QueryState, Snapshot};
use eventdesk_core::store::StoreError;

/// Bookkeeping kept outside the restorable [`QueryState`].
#[derive(Debug, Clone, Copy, Default)]
struct KeyMeta {
    clock: FetchClock,
    fetched_at: Option<Instant>,
}

#[derive(Debug)]
pub(crate) struct CacheState {
    entries: LruCache<QueryKey, QueryState>,
    meta: HashMap<QueryKey, KeyMeta>,
    mounted: HashSet<QueryKey>,
}

impl CacheState {
    pub(crate) fn new(max_entries: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(max_entries),
            meta: HashMap::new(),
            mounted: HashSet::new(),
        }
    }

    /// Cached state without touching recency.
    pub(crate) fn peek(&self, key: &QueryKey) -> Option<&QueryState> {
        self.entries.peek(key)
    }

    /// Every cached key and its state, ordered by key.
    pub(crate) fn entries(&self) -> Vec<(QueryKey, QueryState)> {
        let mut entries: Vec<(QueryKey, QueryState)> = self
            .entries
            .iter()
            .map(|(key, state)| (key.clone(), state.clone()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
    }

    /// The cached state if it can be served without fetching.
    pub(crate) fn fresh(&mut self, key: &QueryKey, stale_time: Duration) -> Option<QueryState> {
        let fetched_at = self.meta.get(key).and_then(|meta| meta.fetched_at)?;
        let state = self.entries.get(key)?;
        let fresh = state.is_success()
            && !state.is_invalidated
            && fetched_at.elapsed() < stale_time;
        fresh.then(|| state.clone())
    }

    pub(crate) fn mount(&mut self, key: QueryKey) -> bool {
        self.mounted.insert(key)
    }

    pub(crate) fn unmount(&mut self, key: &QueryKey) -> bool {
        self.mounted.remove(key)
    }

    pub(crate) fn is_mounted(&self, key: &QueryKey) -> bool {
        self.mounted.contains(key)
    }

    /// Marks a fetch as started and returns its ticket.
    pub(crate) fn begin_fetch(&mut self, key: &QueryKey) -> u64 {
        let ticket = self.meta.entry(key.clone()).or_default().clock.begin();
        self.entry_mut(key).begin_fetch();
        ticket
    }

    /// Applies a fetch result if its ticket is still current.
    ///
    /// Returns the key's state after the attempt either way.
    pub(crate) fn finish_fetch(
        &mut self,
        key: &QueryKey,
        ticket: u64,
        result: std::result::Result<QueryData, StoreError>,
    ) -> QueryState {
        let meta = self.meta.entry(key.clone()).or_default();
        if !meta.clock.accept(ticket) {
            tracing::debug!(key = %key, ticket, "discarding superseded fetch result");
            return self.entries.peek(key).cloned().unwrap_or_default();
        }
        if result.is_ok() {
            meta.fetched_at = Some(Instant::now());
        }
        let state = self.entry_mut(key);
        match result {
            Ok(data) => state.resolve(data),
            Err(error) => {
                tracing::warn!(key = %key, error = %error, "fetch failed");
                state.fail(error.to_string());
            }
        }
        state.clone()
    }

    /// Replaces a key's data with a prediction and rejects in-flight fetches.
    pub(crate) fn apply_optimistic(&mut self, key: &QueryKey, data: QueryData) {
        self.supersede(key);
        self.entry_mut(key).apply_optimistic(data);
    }

    /// Puts every key in `snapshot` back the way it was captured.
    ///
    /// Returns the restored keys that need a refetch: ones still showing a
    /// temporary id from another mutation, and ones captured mid-fetch whose
    /// fetch was just rejected.
    pub(crate) fn restore(&mut self, snapshot: &Snapshot) -> Vec<QueryKey> {
        let mut unsettled = Vec::new();
        for (key, state) in snapshot.entries() {
            self.supersede(key);
            match state {
                Some(state) => {
                    if state.is_loading() || state.has_temporary_ids() {
                        unsettled.push(key.clone());
                    }
                    *self.entry_mut(key) = state.clone();
                }
                None => {
                    self.entries.pop(key);
                }
            }
        }
        unsettled
    }

    /// Flags every cached key matching `pattern` as stale.
    ///
    /// Returns the mounted keys that match, cached or not.
    pub(crate) fn invalidate(&mut self, pattern: &str) -> Vec<QueryKey> {
        for (key, state) in self.entries.iter_mut() {
            if pattern_matches(pattern, &key.to_string()) {
                state.invalidate();
            }
        }
        self.mounted
            .iter()
            .filter(|key| pattern_matches(pattern, &key.to_string()))
            .cloned()
            .collect()
    }

    fn supersede(&mut self, key: &QueryKey) {
        self.meta.entry(key.clone()).or_default().clock.supersede();
    }

    fn entry_mut(&mut self, key: &QueryKey) -> &mut QueryState {
        if !self.entries.contains(key) {
            self.make_room();
        }
        self.entries.get_or_insert_mut(key.clone(), QueryState::idle)
    }

    /// Frees one slot, evicting the least recently used key that is not
    /// mounted. Mounted keys are never evicted; if every key is mounted the
    /// cache grows instead.
    fn make_room(&mut self) {
        let capacity = self.entries.cap();
        if self.entries.len() < capacity.get() {
            return;
        }
        let victim = self
            .entries
            .iter()
            .rev()
            .map(|(key, _)| key)
            .find(|key| !self.mounted.contains(*key))
            .cloned();
        match victim {
            Some(victim) => {
                tracing::trace!(key = %victim, "evicting query");
                self.entries.pop(&victim);
                if !self
                    .meta
                    .get(&victim)
                    .is_some_and(|meta| meta.clock.has_pending())
                {
                    self.meta.remove(&victim);
                }
            }
            None => {
                if let Some(grown) = capacity.checked_add(1) {
                    self.entries.resize(grown);
                }
            }
        }
    }
}
