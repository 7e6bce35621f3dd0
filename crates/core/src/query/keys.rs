use std::fmt;

use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Identifies a cached, fetchable view of the store.
///
/// Keys render as colon-separated segments, most general first, so that a
/// pattern on a prefix (see [`pattern_matches`](super::pattern_matches))
/// covers every more specific key below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryKey {
    /// All events with their attendees: `events`.
    Events,
    /// One event with its attendees: `events:{id}`.
    Event(Uuid),
    /// The attendees of one event: `attendees:{id}`.
    Attendees(Uuid),
}

impl QueryKey {
    /// Key for a single event, or `None` while no event is selected.
    pub fn event(id: Option<Uuid>) -> Option<Self> {
        id.map(QueryKey::Event)
    }

    /// Key for an event's attendees, or `None` while no event is selected.
    pub fn attendees(event_id: Option<Uuid>) -> Option<Self> {
        event_id.map(QueryKey::Attendees)
    }

    /// The event this key is scoped to, if any.
    pub fn event_id(&self) -> Option<Uuid> {
        match self {
            QueryKey::Events => None,
            QueryKey::Event(id) | QueryKey::Attendees(id) => Some(*id),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Events => f.write_str("events"),
            QueryKey::Event(id) => write!(f, "events:{}", id),
            QueryKey::Attendees(id) => write!(f, "attendees:{}", id),
        }
    }
}

impl Serialize for QueryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pattern matching the event list and every event detail key.
pub fn events_pattern() -> String {
    "events:*".to_string()
}

/// Pattern matching exactly the attendee list of one event.
pub fn attendees_pattern(event_id: Uuid) -> String {
    QueryKey::Attendees(event_id).to_string()
}
