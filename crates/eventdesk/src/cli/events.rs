//! Event CLI commands.

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Event management commands.
#[derive(Debug, Parser)]
pub struct EventsCommand {
    #[command(subcommand)]
    pub action: EventsAction,
}

/// Available event actions.
#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// List all events with their capacity.
    List,
    /// Get event by ID.
    Get {
        /// Event ID.
        id: Uuid,
    },
    /// Create a new event.
    Create {
        /// Event title.
        #[arg(long)]
        title: String,
        /// Event description.
        #[arg(long)]
        description: String,
        /// Date and time, e.g. 2025-03-15T09:00.
        #[arg(long)]
        date: String,
        /// Maximum number of attendees.
        #[arg(long)]
        capacity: u32,
    },
    /// Update the given fields of an event.
    Update {
        /// Event ID.
        id: Uuid,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New description.
        #[arg(long)]
        description: Option<String>,
        /// New date and time.
        #[arg(long)]
        date: Option<String>,
        /// New maximum number of attendees.
        #[arg(long)]
        capacity: Option<u32>,
    },
    /// Delete event by ID, along with its attendees.
    Delete {
        /// Event ID.
        id: Uuid,
    },
    /// Show dashboard totals.
    Stats,
}
