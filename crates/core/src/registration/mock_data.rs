//! Demo data for seeding a store.
//!
//! Pure functions with fixed ids and timestamps so seeded stores are
//! reproducible across runs and in tests.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use super::types::{Attendee, Event};

/// Id of the first seeded event ("Tech Conference 2024").
pub const TECH_CONFERENCE_ID: Uuid = Uuid::from_u128(0x1);
/// Id of the second seeded event ("Design Workshop").
pub const DESIGN_WORKSHOP_ID: Uuid = Uuid::from_u128(0x2);
/// Id of the third seeded event ("Startup Networking Night").
pub const NETWORKING_NIGHT_ID: Uuid = Uuid::from_u128(0x3);

fn local(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .unwrap_or_default()
}

fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    local(year, month, day, hour).and_utc()
}

/// Returns the seeded events in creation order.
pub fn seed_events() -> Vec<Event> {
    vec![
        Event {
            id: TECH_CONFERENCE_ID,
            title: "Tech Conference 2024".to_string(),
            description: "Annual technology conference featuring the latest innovations in AI, \
                          cloud computing, and software development."
                .to_string(),
            date: local(2024, 3, 15, 9),
            capacity: 500,
            created_at: utc(2024, 1, 1, 0),
        },
        Event {
            id: DESIGN_WORKSHOP_ID,
            title: "Design Workshop".to_string(),
            description: "Hands-on workshop covering UI/UX design principles, prototyping, and \
                          user research methodologies."
                .to_string(),
            date: local(2024, 3, 20, 14),
            capacity: 30,
            created_at: utc(2024, 1, 5, 0),
        },
        Event {
            id: NETWORKING_NIGHT_ID,
            title: "Startup Networking Night".to_string(),
            description: "Connect with fellow entrepreneurs, investors, and industry leaders in \
                          an informal setting."
                .to_string(),
            date: local(2024, 3, 25, 18),
            capacity: 100,
            created_at: utc(2024, 1, 10, 0),
        },
    ]
}

/// Returns the seeded attendees in registration order.
pub fn seed_attendees() -> Vec<Attendee> {
    vec![
        Attendee {
            id: Uuid::from_u128(0x101),
            event_id: TECH_CONFERENCE_ID,
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            registered_at: utc(2024, 1, 15, 10),
        },
        Attendee {
            id: Uuid::from_u128(0x102),
            event_id: TECH_CONFERENCE_ID,
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            registered_at: utc(2024, 1, 16, 11),
        },
        Attendee {
            id: Uuid::from_u128(0x103),
            event_id: DESIGN_WORKSHOP_ID,
            name: "Bob Johnson".to_string(),
            email: "bob@example.com".to_string(),
            registered_at: utc(2024, 1, 17, 9),
        },
    ]
}
