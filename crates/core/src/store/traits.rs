use async_trait::async_trait;
use uuid::Uuid;

use crate::registration::{Attendee, Event, EventPatch, EventWithAttendees, NewAttendee, NewEvent};

use super::Result;

/// Persistence boundary for events and their attendees.
///
/// Every operation is asynchronous and may fail. Implementations must keep
/// the capacity check and the insert in `create_attendee` atomic with respect
/// to other creates for the same event, and must cascade `delete_event` to
/// the event's attendees in the same logical operation.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Lists every event with its attendees, in creation order.
    async fn list_events(&self) -> Result<Vec<EventWithAttendees>>;

    /// Gets an event with its attendees.
    async fn get_event(&self, id: Uuid) -> Result<Option<EventWithAttendees>>;

    /// Creates an event, assigning its id and creation time.
    async fn create_event(&self, event: NewEvent) -> Result<Event>;

    /// Applies a partial update. Returns `None` if the event does not exist.
    async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Option<Event>>;

    /// Deletes an event and all of its attendees. Returns true if an event
    /// was removed.
    async fn delete_event(&self, id: Uuid) -> Result<bool>;

    /// Lists the attendees of an event, in registration order.
    async fn list_attendees(&self, event_id: Uuid) -> Result<Vec<Attendee>>;

    /// Registers an attendee.
    ///
    /// Fails with [`StoreError::CapacityExceeded`](super::StoreError::CapacityExceeded)
    /// when the event is already full and with
    /// [`StoreError::EventNotFound`](super::StoreError::EventNotFound) when it
    /// does not exist.
    async fn create_attendee(&self, attendee: NewAttendee) -> Result<Attendee>;

    /// Removes an attendee. Returns true if one was removed.
    async fn delete_attendee(&self, id: Uuid) -> Result<bool>;
}
