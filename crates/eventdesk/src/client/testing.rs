//! Test helpers for the query client.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use eventdesk_core::registration::{
    Attendee, Event, EventPatch, EventWithAttendees, NewAttendee, NewEvent,
};
use eventdesk_core::store::{EventStore, Result, StoreError};

use super::{ClientOptions, QueryClient};
use crate::storage::InMemoryStore;

pub(crate) fn seeded_store() -> InMemoryStore {
    InMemoryStore::seeded()
}

/// Client over a seeded store with the default latency.
pub(crate) fn client() -> QueryClient {
    client_with(Arc::new(seeded_store()), ClientOptions::default())
}

pub(crate) fn client_with(store: Arc<dyn EventStore>, options: ClientOptions) -> QueryClient {
    QueryClient::new(store, options)
}

pub(crate) fn new_event(title: &str, capacity: u32) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        description: format!("{} description", title),
        date: NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
        capacity,
    }
}

pub(crate) fn new_attendee(event_id: Uuid, name: &str) -> NewAttendee {
    NewAttendee {
        event_id,
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
    }
}

/// Store wrapper that can fail or slow down the next call on demand and
/// counts calls.
#[derive(Debug)]
pub(crate) struct FlakyStore {
    inner: InMemoryStore,
    read_failure: Mutex<Option<StoreError>>,
    write_failure: Mutex<Option<StoreError>>,
    read_delay: Mutex<Duration>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub(crate) fn new(inner: InMemoryStore) -> Self {
        Self {
            inner,
            read_failure: Mutex::new(None),
            write_failure: Mutex::new(None),
            read_delay: Mutex::new(Duration::ZERO),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Fails the next read with `error`.
    pub(crate) fn fail_reads(&self, error: StoreError) {
        *self.read_failure.lock().unwrap() = Some(error);
    }

    /// Fails the next write with `error`.
    pub(crate) fn fail_writes(&self, error: StoreError) {
        *self.write_failure.lock().unwrap() = Some(error);
    }

    /// Extra delay for reads started from now on.
    pub(crate) fn delay_reads(&self, delay: Duration) {
        *self.read_delay.lock().unwrap() = delay;
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    async fn before_read(&self) -> Result<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let failure = self.read_failure.lock().unwrap().take();
        let delay = *self.read_delay.lock().unwrap();
        if let Some(error) = failure {
            return Err(error);
        }
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    fn before_write(&self) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        match self.write_failure.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EventStore for FlakyStore {
    async fn list_events(&self) -> Result<Vec<EventWithAttendees>> {
        self.before_read().await?;
        self.inner.list_events().await
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<EventWithAttendees>> {
        self.before_read().await?;
        self.inner.get_event(id).await
    }

    async fn create_event(&self, event: NewEvent) -> Result<Event> {
        self.before_write()?;
        self.inner.create_event(event).await
    }

    async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>> {
        self.before_write()?;
        self.inner.update_event(id, patch).await
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool> {
        self.before_write()?;
        self.inner.delete_event(id).await
    }

    async fn list_attendees(&self, event_id: Uuid) -> Result<Vec<Attendee>> {
        self.before_read().await?;
        self.inner.list_attendees(event_id).await
    }

    async fn create_attendee(&self, attendee: NewAttendee) -> Result<Attendee> {
        self.before_write()?;
        self.inner.create_attendee(attendee).await
    }

    async fn delete_attendee(&self, id: Uuid) -> Result<bool> {
        self.before_write()?;
        self.inner.delete_attendee(id).await
    }
}
