//! User-facing notifications emitted when a mutation settles.

use serde::Serialize;

use crate::store::StoreError;

use super::error::MutationError;
use super::mutation::MutationKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A toast-style message: a level, a short title, and a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    /// Notification for a mutation that committed.
    pub fn succeeded(kind: &MutationKind) -> Self {
        Self::success(success_message(kind))
    }

    /// Notification for a mutation that rolled back.
    ///
    /// Capacity rejections carry the store's own message; every other
    /// failure gets the generic retry text for the mutation.
    pub fn failed(kind: &MutationKind, error: &MutationError) -> Self {
        match error {
            MutationError::Store(store_error @ StoreError::CapacityExceeded { .. }) => {
                Self::error(store_error.to_string())
            }
            _ => Self::error(failure_message(kind)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

fn success_message(kind: &MutationKind) -> &'static str {
    match kind {
        MutationKind::CreateEvent(_) => "Event created successfully!",
        MutationKind::UpdateEvent { .. } => "Event updated successfully!",
        MutationKind::DeleteEvent(_) => "Event deleted successfully!",
        MutationKind::CreateAttendee(_) => "Attendee registered successfully!",
        MutationKind::DeleteAttendee { .. } => "Attendee removed successfully!",
    }
}

fn failure_message(kind: &MutationKind) -> &'static str {
    match kind {
        MutationKind::CreateEvent(_) => "Failed to create event. Please try again.",
        MutationKind::UpdateEvent { .. } => "Failed to update event. Please try again.",
        MutationKind::DeleteEvent(_) => "Failed to delete event. Please try again.",
        MutationKind::CreateAttendee(_) => "Failed to register attendee. Please try again.",
        MutationKind::DeleteAttendee { .. } => "Failed to remove attendee. Please try again.",
    }
}
