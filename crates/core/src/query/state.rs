//! Per-key query state machine.
//!
//! `Idle -> Loading -> {Success | Error}`, and back to `Loading` on refetch or
//! optimistic apply. Data survives every transition except an explicit
//! resolve, so a refetching key keeps showing its last value.

use serde::Serialize;

use crate::registration::{is_temporary_id, Attendee, EventWithAttendees};

/// Lifecycle status of a cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    /// Never fetched, or disabled because its key is not known yet.
    Idle,
    /// A fetch or an unconfirmed optimistic write is in flight.
    Loading,
    Success,
    Error,
}

/// Cached value for a query key. The variant follows the key kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum QueryData {
    Events(Vec<EventWithAttendees>),
    Event(Option<EventWithAttendees>),
    Attendees(Vec<Attendee>),
}

/// Observable state of one query key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub status: QueryStatus,
    pub data: Option<QueryData>,
    pub error: Option<String>,
    /// Set by invalidation; cleared by the next successful fetch.
    pub is_invalidated: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::idle()
    }
}

impl QueryState {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            is_invalidated: false,
        }
    }

    /// State of a query whose key depends on an identifier that is not
    /// known yet. Never fetched, never an error.
    pub fn disabled() -> Self {
        Self::idle()
    }

    /// A fetch started. Previous data stays visible.
    pub fn begin_fetch(&mut self) {
        self.status = QueryStatus::Loading;
    }

    /// A fetch delivered authoritative data.
    pub fn resolve(&mut self, data: QueryData) {
        self.status = QueryStatus::Success;
        self.data = Some(data);
        self.error = None;
        self.is_invalidated = false;
    }

    /// A fetch failed. Previous data stays visible.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = QueryStatus::Error;
        self.error = Some(message.into());
    }

    /// Replaces the data with an unconfirmed prediction.
    pub fn apply_optimistic(&mut self, data: QueryData) {
        self.status = QueryStatus::Loading;
        self.data = Some(data);
    }

    pub fn invalidate(&mut self) {
        self.is_invalidated = true;
    }

    pub fn is_idle(&self) -> bool {
        self.status == QueryStatus::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }

    /// True if the data still shows a record that only exists as a
    /// prediction.
    pub fn has_temporary_ids(&self) -> bool {
        match &self.data {
            Some(QueryData::Events(events)) => events.iter().any(|event| is_temporary_id(event.id())),
            Some(QueryData::Event(event)) => event
                .as_ref()
                .is_some_and(|event| is_temporary_id(event.id())),
            Some(QueryData::Attendees(attendees)) => {
                attendees.iter().any(|attendee| is_temporary_id(attendee.id))
            }
            None => false,
        }
    }

    /// The event list, if this key holds one.
    pub fn events(&self) -> Option<&[EventWithAttendees]> {
        match &self.data {
            Some(QueryData::Events(events)) => Some(events),
            _ => None,
        }
    }

    /// The event, if this key holds one that exists.
    pub fn event(&self) -> Option<&EventWithAttendees> {
        match &self.data {
            Some(QueryData::Event(event)) => event.as_ref(),
            _ => None,
        }
    }

    /// The attendee list, if this key holds one.
    pub fn attendees(&self) -> Option<&[Attendee]> {
        match &self.data {
            Some(QueryData::Attendees(attendees)) => Some(attendees),
            _ => None,
        }
    }
}

/// Orders fetch results for one key so a slower, older read can never
/// overwrite a newer one.
///
/// Every fetch takes a ticket from [`begin`](Self::begin). A result is
/// accepted only if its ticket is newer than the last accepted one. Writes
/// that replace the value outside a fetch (optimistic apply, rollback) call
/// [`supersede`](Self::supersede), which rejects every fetch already in
/// flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchClock {
    issued: u64,
    accepted: u64,
}

impl FetchClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for a new fetch.
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Returns true and records the ticket if its result may be applied.
    pub fn accept(&mut self, ticket: u64) -> bool {
        if ticket > self.accepted {
            self.accepted = ticket;
            true
        } else {
            false
        }
    }

    /// Rejects every ticket issued so far.
    pub fn supersede(&mut self) {
        self.accepted = self.issued;
    }

    /// True while some issued ticket can still be accepted.
    pub fn has_pending(&self) -> bool {
        self.issued > self.accepted
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::registration::temporary_id;

    #[test]
    fn test_idle_to_success() {
        let mut state = QueryState::idle();
        assert!(state.is_idle());

        state.begin_fetch();
        assert!(state.is_loading());
        assert!(state.data.is_none());

        state.resolve(QueryData::Attendees(Vec::new()));
        assert!(state.is_success());
        assert_eq!(state.attendees(), Some(&[][..]));
    }

    #[test]
    fn test_refetch_keeps_previous_data() {
        let mut state = QueryState::idle();
        state.resolve(QueryData::Events(Vec::new()));
        state.invalidate();

        state.begin_fetch();

        assert!(state.is_loading());
        assert!(state.is_invalidated);
        assert_eq!(state.events(), Some(&[][..]));
    }

    #[test]
    fn test_fail_keeps_previous_data() {
        let mut state = QueryState::idle();
        state.resolve(QueryData::Events(Vec::new()));
        state.begin_fetch();

        state.fail("Store unavailable: timeout");

        assert!(state.is_error());
        assert_eq!(state.error.as_deref(), Some("Store unavailable: timeout"));
        assert!(state.events().is_some());
    }

    #[test]
    fn test_resolve_clears_error_and_invalidation() {
        let mut state = QueryState::idle();
        state.fail("boom");
        state.invalidate();

        state.resolve(QueryData::Event(None));

        assert!(state.is_success());
        assert_eq!(state.error, None);
        assert!(!state.is_invalidated);
        assert_eq!(state.event(), None);
    }

    #[test]
    fn test_optimistic_apply_moves_back_to_loading() {
        let mut state = QueryState::idle();
        state.resolve(QueryData::Attendees(Vec::new()));

        state.apply_optimistic(QueryData::Attendees(Vec::new()));

        assert!(state.is_loading());
    }

    #[test]
    fn test_accessors_ignore_other_kinds() {
        let mut state = QueryState::idle();
        state.resolve(QueryData::Attendees(Vec::new()));
        assert_eq!(state.events(), None);
        assert_eq!(state.event(), None);
    }

    #[test]
    fn test_has_temporary_ids() {
        let event_id = Uuid::new_v4();
        let confirmed = Attendee::new(event_id, "Ada", "ada@example.com");
        let pending = confirmed.clone().with_id(temporary_id(1));
        let mut state = QueryState::idle();
        assert!(!state.has_temporary_ids());

        state.resolve(QueryData::Attendees(vec![confirmed.clone()]));
        assert!(!state.has_temporary_ids());

        state.apply_optimistic(QueryData::Attendees(vec![confirmed, pending]));
        assert!(state.has_temporary_ids());
        assert_eq!(state.events(), None);
    }

    #[test]
    fn test_clock_rejects_older_result_after_newer() {
        let mut clock = FetchClock::new();
        let older = clock.begin();
        let newer = clock.begin();

        assert!(clock.accept(newer));
        assert!(!clock.accept(older));
        assert!(!clock.has_pending());
    }

    #[test]
    fn test_clock_accepts_older_result_first() {
        let mut clock = FetchClock::new();
        let older = clock.begin();
        let newer = clock.begin();

        assert!(clock.accept(older));
        assert!(clock.has_pending());
        assert!(clock.accept(newer));
    }

    #[test]
    fn test_supersede_rejects_in_flight_fetches() {
        let mut clock = FetchClock::new();
        let in_flight = clock.begin();

        clock.supersede();

        assert!(!clock.accept(in_flight));
        let next = clock.begin();
        assert!(clock.accept(next));
    }
}
