//! In-memory event store implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use eventdesk_core::registration::{
    seed_attendees, seed_events, Attendee, Event, EventPatch, EventWithAttendees, NewAttendee,
    NewEvent,
};
use eventdesk_core::store::{EventStore, Result, StoreError};

/// Artificial delay applied before each store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    /// Event list and every write.
    pub default: Duration,
    /// Single event reads and attendee lists.
    pub lookup: Duration,
}

impl Latency {
    pub const fn none() -> Self {
        Self {
            default: Duration::ZERO,
            lookup: Duration::ZERO,
        }
    }

    pub const fn from_millis(default: u64, lookup: u64) -> Self {
        Self {
            default: Duration::from_millis(default),
            lookup: Duration::from_millis(lookup),
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::from_millis(300, 200)
    }
}

#[derive(Debug, Default)]
struct StoreState {
    events: Vec<Event>,
    attendees: Vec<Attendee>,
}

/// In-memory event store.
///
/// Clones share the same data. Data is lost when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
    latency: Latency,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates an empty store with the default latency.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::default())),
            latency: Latency::default(),
        }
    }

    /// Creates a store holding the demo events and attendees.
    pub fn seeded() -> Self {
        Self::with_data(seed_events(), seed_attendees())
    }

    /// Creates a store holding the given records, in order.
    pub fn with_data(events: Vec<Event>, attendees: Vec<Attendee>) -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState { events, attendees })),
            latency: Latency::default(),
        }
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    async fn delay(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn list_events(&self) -> Result<Vec<EventWithAttendees>> {
        self.delay(self.latency.default).await;
        let state = self.state.read().await;
        Ok(state
            .events
            .iter()
            .map(|event| EventWithAttendees::project(event.clone(), &state.attendees))
            .collect())
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<EventWithAttendees>> {
        self.delay(self.latency.lookup).await;
        let state = self.state.read().await;
        Ok(state
            .events
            .iter()
            .find(|event| event.id == id)
            .map(|event| EventWithAttendees::project(event.clone(), &state.attendees)))
    }

    async fn create_event(&self, event: NewEvent) -> Result<Event> {
        self.delay(self.latency.default).await;
        let event = event.into_event(Uuid::new_v4(), Utc::now());
        let mut state = self.state.write().await;
        state.events.push(event.clone());
        tracing::debug!(event_id = %event.id, "event created");
        Ok(event)
    }

    async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>> {
        self.delay(self.latency.default).await;
        let mut state = self.state.write().await;
        let Some(event) = state.events.iter_mut().find(|event| event.id == id) else {
            return Ok(None);
        };
        patch.apply_to(event);
        tracing::debug!(event_id = %id, "event updated");
        Ok(Some(event.clone()))
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool> {
        self.delay(self.latency.default).await;
        let mut state = self.state.write().await;
        let Some(position) = state.events.iter().position(|event| event.id == id) else {
            return Ok(false);
        };
        state.events.remove(position);
        let before = state.attendees.len();
        state.attendees.retain(|attendee| attendee.event_id != id);
        tracing::debug!(
            event_id = %id,
            attendees_removed = before - state.attendees.len(),
            "event deleted"
        );
        Ok(true)
    }

    async fn list_attendees(&self, event_id: Uuid) -> Result<Vec<Attendee>> {
        self.delay(self.latency.lookup).await;
        let state = self.state.read().await;
        Ok(state
            .attendees
            .iter()
            .filter(|attendee| attendee.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn create_attendee(&self, attendee: NewAttendee) -> Result<Attendee> {
        self.delay(self.latency.default).await;
        // Check and insert under the same write lock.
        let mut state = self.state.write().await;
        let event_id = attendee.event_id;
        let capacity = state
            .events
            .iter()
            .find(|event| event.id == event_id)
            .map(|event| event.capacity)
            .ok_or(StoreError::EventNotFound(event_id))?;
        let registered = state
            .attendees
            .iter()
            .filter(|attendee| attendee.event_id == event_id)
            .count();
        if registered >= capacity as usize {
            tracing::warn!(%event_id, capacity, "registration rejected, event is full");
            return Err(StoreError::CapacityExceeded { event_id, capacity });
        }
        let attendee = attendee.into_attendee(Uuid::new_v4(), Utc::now());
        state.attendees.push(attendee.clone());
        tracing::debug!(%event_id, attendee_id = %attendee.id, "attendee registered");
        Ok(attendee)
    }

    async fn delete_attendee(&self, id: Uuid) -> Result<bool> {
        self.delay(self.latency.default).await;
        let mut state = self.state.write().await;
        let Some(position) = state.attendees.iter().position(|attendee| attendee.id == id) else {
            return Ok(false);
        };
        state.attendees.remove(position);
        tracing::debug!(attendee_id = %id, "attendee removed");
        Ok(true)
    }
}
