//! Capacity statistics derived from event projections.

use serde::Serialize;

use super::types::EventWithAttendees;

/// Spots left at or below which an event counts as almost full.
pub const ALMOST_FULL_THRESHOLD: u32 = 5;

/// How close an event is to its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Open,
    AlmostFull,
    Full,
}

/// Per-event capacity figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapacityStatus {
    pub capacity: u32,
    pub registered: usize,
    pub spots_remaining: u32,
    pub availability: Availability,
}

impl CapacityStatus {
    pub fn new(capacity: u32, registered: usize) -> Self {
        let registered_u32 = u32::try_from(registered).unwrap_or(u32::MAX);
        let spots_remaining = capacity.saturating_sub(registered_u32);
        let availability = match spots_remaining {
            0 => Availability::Full,
            n if n <= ALMOST_FULL_THRESHOLD => Availability::AlmostFull,
            _ => Availability::Open,
        };
        Self {
            capacity,
            registered,
            spots_remaining,
            availability,
        }
    }

    pub fn is_full(&self) -> bool {
        self.availability == Availability::Full
    }

    pub fn is_almost_full(&self) -> bool {
        self.availability == Availability::AlmostFull
    }

    /// Short badge text, e.g. `"12 spots"` or `"Full"`.
    pub fn label(&self) -> String {
        if self.is_full() {
            "Full".to_string()
        } else {
            format!("{} spots", self.spots_remaining)
        }
    }
}

impl EventWithAttendees {
    pub fn capacity_status(&self) -> CapacityStatus {
        CapacityStatus::new(self.event.capacity, self.attendee_count)
    }
}

/// Aggregate figures shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_events: usize,
    pub total_attendees: usize,
    pub total_capacity: u64,
}

impl DashboardStats {
    pub fn from_events(events: &[EventWithAttendees]) -> Self {
        Self {
            total_events: events.len(),
            total_attendees: events.iter().map(|e| e.attendee_count).sum(),
            total_capacity: events.iter().map(|e| u64::from(e.event.capacity)).sum(),
        }
    }

    /// Share of total capacity that is registered, rounded to a whole percent.
    /// Zero when there is no capacity at all.
    pub fn fill_rate_percent(&self) -> u32 {
        if self.total_capacity == 0 {
            return 0;
        }
        ((self.total_attendees as f64 / self.total_capacity as f64) * 100.0).round() as u32
    }
}
