//! Pure optimistic-apply functions.
//!
//! Given the mutation, a key it affects and that key's current cached value,
//! each function predicts the value the key will hold once the write lands.
//! `None` means "leave the key alone": either the key holds nothing the
//! mutation can change, or the prediction equals the current value.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::registration::{Attendee, EventPatch, EventWithAttendees, NewAttendee, NewEvent};

use super::keys::QueryKey;
use super::mutation::MutationKind;
use super::state::QueryData;

/// Values synthesized for provisional records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimisticContext {
    /// Provisional id; see [`temporary_id`](crate::registration::temporary_id).
    pub temp_id: Uuid,
    pub now: DateTime<Utc>,
}

/// Predicts the value of `key` after `kind` succeeds.
pub fn optimistic_data(
    kind: &MutationKind,
    key: &QueryKey,
    current: Option<&QueryData>,
    ctx: &OptimisticContext,
) -> Option<QueryData> {
    match kind {
        MutationKind::CreateEvent(new_event) => create_event(new_event, key, current, ctx),
        MutationKind::UpdateEvent { id, patch } => update_event(*id, patch, key, current),
        MutationKind::DeleteEvent(id) => delete_event(*id, key, current),
        MutationKind::CreateAttendee(new_attendee) => {
            create_attendee(new_attendee, key, current, ctx)
        }
        MutationKind::DeleteAttendee { id, event_id } => {
            delete_attendee(*id, *event_id, key, current)
        }
    }
}

fn create_event(
    new_event: &NewEvent,
    key: &QueryKey,
    current: Option<&QueryData>,
    ctx: &OptimisticContext,
) -> Option<QueryData> {
    if *key != QueryKey::Events {
        return None;
    }
    let placeholder = EventWithAttendees::from_parts(
        new_event.clone().into_event(ctx.temp_id, ctx.now),
        Vec::new(),
    );
    match current {
        Some(QueryData::Events(events)) => {
            let mut events = events.clone();
            events.push(placeholder);
            Some(QueryData::Events(events))
        }
        None => Some(QueryData::Events(vec![placeholder])),
        Some(_) => None,
    }
}

fn update_event(
    id: Uuid,
    patch: &EventPatch,
    key: &QueryKey,
    current: Option<&QueryData>,
) -> Option<QueryData> {
    if patch.is_empty() {
        return None;
    }
    match (key, current) {
        (QueryKey::Events, Some(QueryData::Events(events))) => {
            let index = events.iter().position(|e| e.id() == id)?;
            let mut events = events.clone();
            patch.apply_to(&mut events[index].event);
            Some(QueryData::Events(events))
        }
        (QueryKey::Event(key_id), Some(QueryData::Event(Some(event)))) if *key_id == id => {
            let mut event = event.clone();
            patch.apply_to(&mut event.event);
            Some(QueryData::Event(Some(event)))
        }
        _ => None,
    }
}

fn delete_event(id: Uuid, key: &QueryKey, current: Option<&QueryData>) -> Option<QueryData> {
    match (key, current) {
        (QueryKey::Events, Some(QueryData::Events(events))) => {
            if !events.iter().any(|e| e.id() == id) {
                return None;
            }
            let events = events.iter().filter(|e| e.id() != id).cloned().collect();
            Some(QueryData::Events(events))
        }
        (QueryKey::Event(key_id), Some(QueryData::Event(Some(_)))) if *key_id == id => {
            Some(QueryData::Event(None))
        }
        (QueryKey::Attendees(event_id), Some(QueryData::Attendees(attendees)))
            if *event_id == id && !attendees.is_empty() =>
        {
            Some(QueryData::Attendees(Vec::new()))
        }
        _ => None,
    }
}

fn create_attendee(
    new_attendee: &NewAttendee,
    key: &QueryKey,
    current: Option<&QueryData>,
    ctx: &OptimisticContext,
) -> Option<QueryData> {
    let event_id = new_attendee.event_id;
    let placeholder: Attendee = new_attendee.clone().into_attendee(ctx.temp_id, ctx.now);
    match (key, current) {
        (QueryKey::Attendees(key_id), current) if *key_id == event_id => match current {
            Some(QueryData::Attendees(attendees)) => {
                let mut attendees = attendees.clone();
                attendees.push(placeholder);
                Some(QueryData::Attendees(attendees))
            }
            None => Some(QueryData::Attendees(vec![placeholder])),
            Some(_) => None,
        },
        (QueryKey::Events, Some(QueryData::Events(events))) => {
            let index = events.iter().position(|e| e.id() == event_id)?;
            let mut events = events.clone();
            events[index].push_attendee(placeholder);
            Some(QueryData::Events(events))
        }
        (QueryKey::Event(key_id), Some(QueryData::Event(Some(event)))) if *key_id == event_id => {
            let mut event = event.clone();
            event.push_attendee(placeholder);
            Some(QueryData::Event(Some(event)))
        }
        _ => None,
    }
}

fn delete_attendee(
    id: Uuid,
    event_id: Uuid,
    key: &QueryKey,
    current: Option<&QueryData>,
) -> Option<QueryData> {
    match (key, current) {
        (QueryKey::Attendees(key_id), Some(QueryData::Attendees(attendees)))
            if *key_id == event_id =>
        {
            if !attendees.iter().any(|a| a.id == id) {
                return None;
            }
            let attendees = attendees.iter().filter(|a| a.id != id).cloned().collect();
            Some(QueryData::Attendees(attendees))
        }
        (QueryKey::Events, Some(QueryData::Events(events))) => {
            let index = events.iter().position(|e| e.id() == event_id)?;
            let mut events = events.clone();
            events[index].remove_attendee(id).then_some(QueryData::Events(events))
        }
        (QueryKey::Event(key_id), Some(QueryData::Event(Some(event)))) if *key_id == event_id => {
            let mut event = event.clone();
            event
                .remove_attendee(id)
                .then_some(QueryData::Event(Some(event)))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{is_temporary_id, temporary_id, Event};
    use chrono::NaiveDate;

    fn ctx() -> OptimisticContext {
        OptimisticContext {
            temp_id: temporary_id(1),
            now: Utc::now(),
        }
    }

    fn date() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn new_event(title: &str, capacity: u32) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            description: "Description".to_string(),
            date: date(),
            capacity,
        }
    }

    fn stored_event(capacity: u32) -> EventWithAttendees {
        let event = Event::new("Stored", "Description", date(), capacity);
        let attendee = Attendee::new(event.id, "Ann", "ann@example.com");
        EventWithAttendees::from_parts(event, vec![attendee])
    }

    #[test]
    fn test_create_event_appends_placeholder_with_zero_count() {
        let existing = stored_event(10);
        let current = QueryData::Events(vec![existing.clone()]);
        let kind = MutationKind::CreateEvent(new_event("T", 5));

        let Some(QueryData::Events(events)) =
            optimistic_data(&kind, &QueryKey::Events, Some(&current), &ctx())
        else {
            panic!("expected an event list");
        };

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], existing);
        assert_eq!(events[1].event.title, "T");
        assert_eq!(events[1].attendee_count, 0);
        assert!(is_temporary_id(events[1].id()));
    }

    #[test]
    fn test_create_event_on_empty_cache_starts_list() {
        let kind = MutationKind::CreateEvent(new_event("T", 5));

        let data = optimistic_data(&kind, &QueryKey::Events, None, &ctx());

        assert!(matches!(data, Some(QueryData::Events(events)) if events.len() == 1));
    }

    #[test]
    fn test_update_event_patches_list_and_detail() {
        let existing = stored_event(10);
        let id = existing.id();
        let kind = MutationKind::UpdateEvent {
            id,
            patch: EventPatch {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        };

        let list = QueryData::Events(vec![existing.clone()]);
        let Some(QueryData::Events(events)) =
            optimistic_data(&kind, &QueryKey::Events, Some(&list), &ctx())
        else {
            panic!("expected an event list");
        };
        assert_eq!(events[0].event.title, "Renamed");
        assert_eq!(events[0].attendee_count, 1);

        let detail = QueryData::Event(Some(existing));
        let Some(QueryData::Event(Some(event))) =
            optimistic_data(&kind, &QueryKey::Event(id), Some(&detail), &ctx())
        else {
            panic!("expected an event");
        };
        assert_eq!(event.event.title, "Renamed");
    }

    #[test]
    fn test_update_unknown_event_leaves_key_alone() {
        let list = QueryData::Events(vec![stored_event(10)]);
        let kind = MutationKind::UpdateEvent {
            id: Uuid::new_v4(),
            patch: EventPatch {
                capacity: Some(1),
                ..Default::default()
            },
        };

        assert_eq!(
            optimistic_data(&kind, &QueryKey::Events, Some(&list), &ctx()),
            None
        );
    }

    #[test]
    fn test_delete_event_clears_every_view() {
        let existing = stored_event(10);
        let id = existing.id();
        let kind = MutationKind::DeleteEvent(id);

        let list = QueryData::Events(vec![existing.clone()]);
        assert_eq!(
            optimistic_data(&kind, &QueryKey::Events, Some(&list), &ctx()),
            Some(QueryData::Events(Vec::new()))
        );

        let detail = QueryData::Event(Some(existing.clone()));
        assert_eq!(
            optimistic_data(&kind, &QueryKey::Event(id), Some(&detail), &ctx()),
            Some(QueryData::Event(None))
        );

        let attendees = QueryData::Attendees(existing.attendees.clone());
        assert_eq!(
            optimistic_data(&kind, &QueryKey::Attendees(id), Some(&attendees), &ctx()),
            Some(QueryData::Attendees(Vec::new()))
        );
    }

    #[test]
    fn test_delete_missing_event_changes_nothing() {
        let list = QueryData::Events(vec![stored_event(10)]);
        let kind = MutationKind::DeleteEvent(Uuid::new_v4());

        assert_eq!(
            optimistic_data(&kind, &QueryKey::Events, Some(&list), &ctx()),
            None
        );
    }

    #[test]
    fn test_create_attendee_updates_list_and_counts() {
        let existing = stored_event(10);
        let event_id = existing.id();
        let kind = MutationKind::CreateAttendee(NewAttendee {
            event_id,
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
        });

        let attendees = QueryData::Attendees(existing.attendees.clone());
        let Some(QueryData::Attendees(attendees)) = optimistic_data(
            &kind,
            &QueryKey::Attendees(event_id),
            Some(&attendees),
            &ctx(),
        ) else {
            panic!("expected attendees");
        };
        assert_eq!(attendees.len(), 2);
        assert!(is_temporary_id(attendees[1].id));

        let list = QueryData::Events(vec![existing.clone()]);
        let Some(QueryData::Events(events)) =
            optimistic_data(&kind, &QueryKey::Events, Some(&list), &ctx())
        else {
            panic!("expected an event list");
        };
        assert_eq!(events[0].attendee_count, 2);

        let detail = QueryData::Event(Some(existing));
        let Some(QueryData::Event(Some(event))) =
            optimistic_data(&kind, &QueryKey::Event(event_id), Some(&detail), &ctx())
        else {
            panic!("expected an event");
        };
        assert_eq!(event.attendee_count, 2);
    }

    #[test]
    fn test_create_attendee_ignores_other_events() {
        let kind = MutationKind::CreateAttendee(NewAttendee {
            event_id: Uuid::new_v4(),
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
        });
        let other = QueryKey::Attendees(Uuid::new_v4());

        assert_eq!(
            optimistic_data(&kind, &other, Some(&QueryData::Attendees(Vec::new())), &ctx()),
            None
        );
    }

    #[test]
    fn test_delete_attendee_updates_every_view() {
        let existing = stored_event(10);
        let event_id = existing.id();
        let attendee_id = existing.attendees[0].id;
        let kind = MutationKind::DeleteAttendee {
            id: attendee_id,
            event_id,
        };

        let attendees = QueryData::Attendees(existing.attendees.clone());
        assert_eq!(
            optimistic_data(
                &kind,
                &QueryKey::Attendees(event_id),
                Some(&attendees),
                &ctx()
            ),
            Some(QueryData::Attendees(Vec::new()))
        );

        let list = QueryData::Events(vec![existing.clone()]);
        let Some(QueryData::Events(events)) =
            optimistic_data(&kind, &QueryKey::Events, Some(&list), &ctx())
        else {
            panic!("expected an event list");
        };
        assert_eq!(events[0].attendee_count, 0);
    }

    #[test]
    fn test_delete_unknown_attendee_changes_nothing() {
        let existing = stored_event(10);
        let kind = MutationKind::DeleteAttendee {
            id: Uuid::new_v4(),
            event_id: existing.id(),
        };
        let list = QueryData::Events(vec![existing]);

        assert_eq!(
            optimistic_data(&kind, &QueryKey::Events, Some(&list), &ctx()),
            None
        );
    }
}
