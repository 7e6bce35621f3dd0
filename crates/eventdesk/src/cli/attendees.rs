//! Attendee CLI commands.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Attendee registration commands.
#[derive(Debug, Parser)]
pub struct AttendeesCommand {
    #[command(subcommand)]
    pub action: AttendeesAction,
}

/// Available attendee actions.
#[derive(Debug, Subcommand)]
pub enum AttendeesAction {
    /// List the attendees of an event.
    List {
        /// Event ID.
        event_id: Uuid,
    },
    /// Register an attendee for an event.
    Register {
        /// Event ID.
        event_id: Uuid,
        /// Attendee name.
        #[arg(long)]
        name: String,
        /// Attendee email.
        #[arg(long)]
        email: String,
    },
    /// Remove an attendee from an event.
    Remove {
        /// Event ID.
        event_id: Uuid,
        /// Attendee ID.
        attendee_id: Uuid,
    },
}
