//! Pretty output formatting.

use eventdesk_core::query::{Notification, NotificationLevel};
use eventdesk_core::registration::{Attendee, DashboardStats, EventWithAttendees};

/// Format an event for display.
pub fn format_event(event: &EventWithAttendees) -> String {
    let status = event.capacity_status();
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Date: {}\n  Attendees: {}/{}",
        event.event.title,
        status.label(),
        event.id(),
        event.event.date.format("%Y-%m-%d %H:%M"),
        status.registered,
        status.capacity,
    );
    if !event.event.description.is_empty() {
        output.push_str(&format!("\n  Description: {}", event.event.description));
    }
    output
}

/// Format events for display.
pub fn format_events(events: &[EventWithAttendees]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }
    let mut output = format!("EVENTS ({})\n", events.len());
    output.push_str(&"-".repeat(40));
    for event in events {
        output.push_str(&format!("\n{}", format_event(event)));
        output.push('\n');
    }
    output
}

/// Format an attendee for display.
pub fn format_attendee(attendee: &Attendee) -> String {
    format!(
        "{} <{}>\n  ID: {}\n  Registered: {}",
        attendee.name,
        attendee.email,
        attendee.id,
        attendee.registered_at.format("%Y-%m-%d %H:%M")
    )
}

/// Format attendees for display.
pub fn format_attendees(attendees: &[Attendee]) -> String {
    if attendees.is_empty() {
        return "No attendees registered yet.".to_string();
    }
    let mut output = format!("ATTENDEES ({})\n", attendees.len());
    output.push_str(&"-".repeat(40));
    for attendee in attendees {
        output.push_str(&format!("\n{}", format_attendee(attendee)));
        output.push('\n');
    }
    output
}

/// Format dashboard totals for display.
pub fn format_stats(stats: &DashboardStats) -> String {
    format!(
        "Total events: {}\nTotal attendees: {}\nTotal capacity: {}\nFill rate: {}%",
        stats.total_events,
        stats.total_attendees,
        stats.total_capacity,
        stats.fill_rate_percent()
    )
}

/// Format a notification as a one-line toast.
pub fn format_notification(notification: &Notification) -> String {
    let marker = match notification.level {
        NotificationLevel::Success => "✓",
        NotificationLevel::Error => "✗",
    };
    format!("{} {}: {}", marker, notification.title, notification.message)
}
