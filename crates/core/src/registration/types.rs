use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// High half of every temporary id. The version nibble of this range is 0,
/// so it never collides with the v4 ids handed out by a store.
const TEMPORARY_ID_PREFIX: u64 = 0x7465_6d70_0000_0000;

/// Returns the provisional id for the `seq`-th optimistic record.
pub fn temporary_id(seq: u64) -> Uuid {
    Uuid::from_u64_pair(TEMPORARY_ID_PREFIX, seq)
}

/// Returns true if `id` was produced by [`temporary_id`].
pub fn is_temporary_id(id: Uuid) -> bool {
    id.as_u64_pair().0 == TEMPORARY_ID_PREFIX
}

/// A scheduled event that attendees can register for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Local date and time the event takes place.
    pub date: NaiveDateTime,
    /// Upper bound on the number of registered attendees.
    pub capacity: u32,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Creates a new event with a fresh id, stamped with the current time.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDateTime,
        capacity: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            date,
            capacity,
            created_at: Utc::now(),
        }
    }

    /// Sets a specific ID for this event (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A person registered for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: Uuid,
    /// The event this attendee is registered for.
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub registered_at: DateTime<Utc>,
}

impl Attendee {
    /// Creates a new attendee with a fresh id, stamped with the current time.
    pub fn new(event_id: Uuid, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            name: name.into(),
            email: email.into(),
            registered_at: Utc::now(),
        }
    }

    /// Sets a specific ID for this attendee (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the registration timestamp.
    pub fn with_registered_at(mut self, registered_at: DateTime<Utc>) -> Self {
        self.registered_at = registered_at;
        self
    }
}

/// Read-side projection of an event together with its attendees.
///
/// Never stored: `attendee_count` is derived from `attendees` every time the
/// projection is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWithAttendees {
    #[serde(flatten)]
    pub event: Event,
    pub attendees: Vec<Attendee>,
    pub attendee_count: usize,
}

impl EventWithAttendees {
    /// Builds the projection for `event` from the full attendee collection.
    pub fn project(event: Event, all_attendees: &[Attendee]) -> Self {
        let attendees: Vec<Attendee> = all_attendees
            .iter()
            .filter(|attendee| attendee.event_id == event.id)
            .cloned()
            .collect();
        Self::from_parts(event, attendees)
    }

    /// Builds the projection from an event and the attendees already known
    /// to belong to it.
    pub fn from_parts(event: Event, attendees: Vec<Attendee>) -> Self {
        let attendee_count = attendees.len();
        Self {
            event,
            attendees,
            attendee_count,
        }
    }

    pub fn id(&self) -> Uuid {
        self.event.id
    }

    /// Appends an attendee, keeping the count in step.
    pub fn push_attendee(&mut self, attendee: Attendee) {
        self.attendees.push(attendee);
        self.attendee_count = self.attendees.len();
    }

    /// Removes an attendee by id. Returns true if one was removed.
    pub fn remove_attendee(&mut self, attendee_id: Uuid) -> bool {
        let before = self.attendees.len();
        self.attendees.retain(|attendee| attendee.id != attendee_id);
        self.attendee_count = self.attendees.len();
        self.attendees.len() < before
    }
}

/// Validated input for creating an event.
///
/// Produced by [`EventForm::validate`](super::EventForm::validate); the store
/// assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDateTime,
    pub capacity: u32,
}

impl NewEvent {
    /// Materializes the event with the given id and creation time.
    pub fn into_event(self, id: Uuid, created_at: DateTime<Utc>) -> Event {
        Event {
            id,
            title: self.title,
            description: self.description,
            date: self.date,
            capacity: self.capacity,
            created_at,
        }
    }
}

/// Validated input for registering an attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAttendee {
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
}

impl NewAttendee {
    /// Materializes the attendee with the given id and registration time.
    pub fn into_attendee(self, id: Uuid, registered_at: DateTime<Utc>) -> Attendee {
        Attendee {
            id,
            event_id: self.event_id,
            name: self.name,
            email: self.email,
            registered_at,
        }
    }
}

/// Partial update for an event. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

impl EventPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.capacity.is_none()
    }

    /// Apply updates to an existing event. `id` and `created_at` never change.
    pub fn apply_to(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(capacity) = self.capacity {
            event.capacity = capacity;
        }
    }
}
