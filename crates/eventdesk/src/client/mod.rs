//! Query client: the process-wide cache over an [`EventStore`].
//!
//! Reads go through [`QueryClient::query`] and friends, which serve fresh
//! cached data or fetch it. Writes go through the mutation methods in
//! [`mutations`], which update the cache optimistically and reconcile it with
//! the store once the write settles.

mod cache;
pub mod mutations;

#[cfg(test)]
pub(crate) mod testing;

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, Mutex, MutexGuard};
use tokio::task::JoinSet;
use uuid::Uuid;

use eventdesk_core::query::{Notification, QueryData, QueryKey, QueryState};
use eventdesk_core::store::{EventStore, Result as StoreResult};

use crate::config::Config;
use crate::notify::{NotificationHub, DEFAULT_CAPACITY};

use self::cache::CacheState;

/// Tuning for a [`QueryClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// How long a successful fetch is served without refetching.
    pub stale_time: Duration,
    /// Query keys kept before least recently used ones are evicted.
    pub max_entries: NonZeroUsize,
    /// Notifications buffered per subscriber.
    pub notification_capacity: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::ZERO,
            max_entries: NonZeroUsize::new(1_000).unwrap_or(NonZeroUsize::MIN),
            notification_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl From<&Config> for ClientOptions {
    fn from(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            stale_time: config.stale_time(),
            max_entries: NonZeroUsize::new(config.cache_max_entries).unwrap_or(defaults.max_entries),
            notification_capacity: config.notification_capacity,
        }
    }
}

/// Client-side cache of store reads with optimistic mutations.
///
/// Cheap to clone; clones share the same cache.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn EventStore>,
    cache: Mutex<CacheState>,
    notifications: NotificationHub,
    stale_time: Duration,
    next_mutation: AtomicU64,
    next_temporary: AtomicU64,
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("stale_time", &self.inner.stale_time)
            .finish_non_exhaustive()
    }
}

impl QueryClient {
    pub fn new(store: Arc<dyn EventStore>, options: ClientOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                cache: Mutex::new(CacheState::new(options.max_entries)),
                notifications: NotificationHub::new(options.notification_capacity),
                stale_time: options.stale_time,
                next_mutation: AtomicU64::new(0),
                next_temporary: AtomicU64::new(0),
            }),
        }
    }

    /// Hub that receives one notification per settled mutation.
    pub fn notifications(&self) -> &NotificationHub {
        &self.inner.notifications
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.inner.notifications.subscribe()
    }

    /// Reads `key`, serving the cached value when it is fresh.
    pub async fn query(&self, key: QueryKey) -> QueryState {
        if let Some(state) = self.lock().await.fresh(&key, self.inner.stale_time) {
            tracing::trace!(key = %key, "serving fresh query from cache");
            return state;
        }
        self.fetch(key).await
    }

    /// All events with their attendees.
    pub async fn events(&self) -> QueryState {
        self.query(QueryKey::Events).await
    }

    /// One event with its attendees. Disabled while `id` is `None`.
    pub async fn event(&self, id: Option<Uuid>) -> QueryState {
        match QueryKey::event(id) {
            Some(key) => self.query(key).await,
            None => QueryState::disabled(),
        }
    }

    /// The attendees of one event. Disabled while `event_id` is `None`.
    pub async fn attendees(&self, event_id: Option<Uuid>) -> QueryState {
        match QueryKey::attendees(event_id) {
            Some(key) => self.query(key).await,
            None => QueryState::disabled(),
        }
    }

    /// Fetches `key` regardless of freshness.
    pub async fn refetch(&self, key: QueryKey) -> QueryState {
        self.fetch(key).await
    }

    /// Marks `key` as displayed and reads it. Invalidating a mounted key
    /// refetches it right away.
    pub async fn mount(&self, key: QueryKey) -> QueryState {
        if self.lock().await.mount(key.clone()) {
            tracing::debug!(key = %key, "query mounted");
        }
        self.query(key).await
    }

    pub async fn unmount(&self, key: &QueryKey) {
        if self.lock().await.unmount(key) {
            tracing::debug!(key = %key, "query unmounted");
        }
    }

    pub async fn is_mounted(&self, key: &QueryKey) -> bool {
        self.lock().await.is_mounted(key)
    }

    /// Cached state of `key`, without fetching.
    pub async fn peek(&self, key: &QueryKey) -> Option<QueryState> {
        self.lock().await.peek(key).cloned()
    }

    /// Every cached key and its state, without fetching.
    pub async fn snapshot(&self) -> Vec<(QueryKey, QueryState)> {
        self.lock().await.entries()
    }

    /// Marks every key matching `pattern` stale and refetches the mounted
    /// ones. Returns once those refetches have landed.
    pub async fn invalidate(&self, pattern: &str) {
        let mounted = self.lock().await.invalidate(pattern);
        tracing::debug!(pattern, refetching = mounted.len(), "invalidated queries");
        self.refetch_all(mounted).await;
    }

    async fn fetch(&self, key: QueryKey) -> QueryState {
        let ticket = self.lock().await.begin_fetch(&key);
        tracing::trace!(key = %key, ticket, "fetch started");
        let result = self.load(&key).await;
        self.lock().await.finish_fetch(&key, ticket, result)
    }

    async fn load(&self, key: &QueryKey) -> StoreResult<QueryData> {
        let store = &self.inner.store;
        match key {
            QueryKey::Events => store.list_events().await.map(QueryData::Events),
            QueryKey::Event(id) => store.get_event(*id).await.map(QueryData::Event),
            QueryKey::Attendees(event_id) => {
                store.list_attendees(*event_id).await.map(QueryData::Attendees)
            }
        }
    }

    /// Refetches `keys` concurrently and waits for all of them.
    async fn refetch_all(&self, mut keys: Vec<QueryKey>) {
        keys.sort();
        keys.dedup();
        let mut tasks = JoinSet::new();
        for key in keys {
            let client = self.clone();
            tasks.spawn(async move {
                client.fetch(key).await;
            });
        }
        while let Some(result) = tasks.join_next().await {
            if let Err(error) = result {
                tracing::warn!(error = %error, "refetch task failed");
            }
        }
    }

    async fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.inner.cache.lock().await
    }

    fn next_mutation_id(&self) -> u64 {
        self.inner.next_mutation.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn next_temporary_seq(&self) -> u64 {
        self.inner.next_temporary.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn store(&self) -> Arc<dyn EventStore> {
        Arc::clone(&self.inner.store)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{client, client_with, seeded_store};
    use super::*;
    use eventdesk_core::query::QueryStatus;
    use eventdesk_core::registration::{DESIGN_WORKSHOP_ID, TECH_CONFERENCE_ID};
    use eventdesk_core::store::StoreError;

    use crate::client::testing::FlakyStore;

    #[tokio::test(start_paused = true)]
    async fn test_events_query_fetches_and_resolves() {
        let client = client();

        let state = client.events().await;

        assert_eq!(state.status, QueryStatus::Success);
        assert_eq!(state.events().unwrap().len(), 3);
        assert_eq!(client.peek(&QueryKey::Events).await, Some(state));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_queries_never_fetch() {
        let client = client();

        let event = client.event(None).await;
        let attendees = client.attendees(None).await;

        assert!(event.is_idle());
        assert!(event.data.is_none());
        assert!(event.error.is_none());
        assert!(attendees.is_idle());
        assert!(client.snapshot().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_and_attendees_queries() {
        let client = client();

        let event = client.event(Some(TECH_CONFERENCE_ID)).await;
        let attendees = client.attendees(Some(DESIGN_WORKSHOP_ID)).await;

        assert_eq!(event.event().unwrap().attendee_count, 2);
        assert_eq!(attendees.attendees().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_event_resolves_to_none() {
        let client = client();

        let state = client.event(Some(Uuid::new_v4())).await;

        assert!(state.is_success());
        assert_eq!(state.event(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_query_is_served_from_cache() {
        let store = Arc::new(FlakyStore::new(seeded_store()));
        let client = client_with(
            store.clone(),
            ClientOptions {
                stale_time: Duration::from_secs(60),
                ..Default::default()
            },
        );

        client.events().await;
        client.events().await;
        assert_eq!(store.reads(), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        client.events().await;
        assert_eq!(store.reads(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_stale_time_always_refetches() {
        let store = Arc::new(FlakyStore::new(seeded_store()));
        let client = client_with(store.clone(), ClientOptions::default());

        client.events().await;
        client.events().await;

        assert_eq!(store.reads(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_error_keeps_previous_data() {
        let store = Arc::new(FlakyStore::new(seeded_store()));
        let client = client_with(store.clone(), ClientOptions::default());
        client.events().await;

        store.fail_reads(StoreError::Unavailable("connection reset".into()));
        let state = client.refetch(QueryKey::Events).await;

        assert!(state.is_error());
        assert_eq!(
            state.error.as_deref(),
            Some("Store unavailable: connection reset")
        );
        assert_eq!(state.events().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slower_older_fetch_does_not_overwrite_newer() {
        let store = Arc::new(FlakyStore::new(seeded_store()));
        let client = client_with(store.clone(), ClientOptions::default());

        store.delay_reads(Duration::from_millis(500));
        let slow = tokio::spawn({
            let client = client.clone();
            async move { client.refetch(QueryKey::Events).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        store.delay_reads(Duration::ZERO);
        store.fail_reads(StoreError::Unavailable("newer".into()));
        let newer = client.refetch(QueryKey::Events).await;
        assert!(newer.is_error());

        let slow = slow.await.unwrap();

        assert!(slow.is_error());
        assert_eq!(slow.error.as_deref(), Some("Store unavailable: newer"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_refetches_mounted_and_marks_others() {
        let client = client();
        client.mount(QueryKey::Events).await;
        client.event(Some(TECH_CONFERENCE_ID)).await;

        client.invalidate("events:*").await;

        let events = client.peek(&QueryKey::Events).await.unwrap();
        assert!(events.is_success());
        assert!(!events.is_invalidated);
        let event = client
            .peek(&QueryKey::Event(TECH_CONFERENCE_ID))
            .await
            .unwrap();
        assert!(event.is_invalidated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount() {
        let client = client();
        client.mount(QueryKey::Events).await;
        assert!(client.is_mounted(&QueryKey::Events).await);

        client.unmount(&QueryKey::Events).await;

        assert!(!client.is_mounted(&QueryKey::Events).await);
    }
}
