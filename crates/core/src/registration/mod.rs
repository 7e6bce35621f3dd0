mod error;
mod mock_data;
mod operations;
mod requests;
mod stats;
mod types;

pub use error::{Field, ValidationError, ValidationErrors};
pub use mock_data::{
    seed_attendees, seed_events, DESIGN_WORKSHOP_ID, NETWORKING_NIGHT_ID, TECH_CONFERENCE_ID,
};
pub use operations::{
    parse_event_date, validate_capacity, validate_date, validate_email, validate_text,
    DESCRIPTION_MAX_CHARS, EMAIL_MAX_CHARS, MAX_CAPACITY, MIN_CAPACITY, NAME_MAX_CHARS,
    TITLE_MAX_CHARS,
};
pub use requests::{AttendeeForm, EventForm, EventPatchForm};
pub use stats::{Availability, CapacityStatus, DashboardStats, ALMOST_FULL_THRESHOLD};
pub use types::{
    is_temporary_id, temporary_id, Attendee, Event, EventPatch, EventWithAttendees, NewAttendee,
    NewEvent,
};
