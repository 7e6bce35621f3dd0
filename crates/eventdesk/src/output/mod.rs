//! Output formatting functions.

pub mod json;
pub mod pretty;

use serde::Serialize;

use eventdesk_core::query::Notification;
use eventdesk_core::registration::{Attendee, DashboardStats, EventWithAttendees};

use crate::cli::OutputFormat;

/// Human-readable rendering used by `--format pretty`.
pub trait Pretty {
    fn pretty(&self) -> String;
}

/// Format a value for output.
pub fn format_output<T>(value: &T, format: OutputFormat) -> String
where
    T: Serialize + Pretty + ?Sized,
{
    match format {
        OutputFormat::Json => json::format_json(value),
        OutputFormat::Pretty => value.pretty(),
    }
}

impl<T> Pretty for Vec<T>
where
    [T]: Pretty,
{
    fn pretty(&self) -> String {
        self.as_slice().pretty()
    }
}

impl Pretty for EventWithAttendees {
    fn pretty(&self) -> String {
        pretty::format_event(self)
    }
}

impl Pretty for [EventWithAttendees] {
    fn pretty(&self) -> String {
        pretty::format_events(self)
    }
}

impl Pretty for Attendee {
    fn pretty(&self) -> String {
        pretty::format_attendee(self)
    }
}

impl Pretty for [Attendee] {
    fn pretty(&self) -> String {
        pretty::format_attendees(self)
    }
}

impl Pretty for DashboardStats {
    fn pretty(&self) -> String {
        pretty::format_stats(self)
    }
}

impl Pretty for Notification {
    fn pretty(&self) -> String {
        pretty::format_notification(self)
    }
}
