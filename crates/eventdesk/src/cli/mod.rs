//! CLI command definitions.

pub mod attendees;
pub mod events;

use clap::{Parser, Subcommand, ValueEnum};

/// Event registration desk backed by an in-memory store.
///
/// Every run starts from a fresh store, seeded with demo data unless
/// `EVENTDESK_SEED=false`.
#[derive(Debug, Parser)]
#[command(name = "eventdesk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(long, env = "EVENTDESK_FORMAT", default_value = "pretty")]
    pub format: OutputFormat,

    /// Skip the simulated store latency.
    #[arg(long)]
    pub no_latency: bool,

    /// Suppress notifications and other non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Event management and statistics.
    Events(events::EventsCommand),
    /// Attendee registration.
    Attendees(attendees::AttendeesCommand),
    /// Walk through optimistic creation and the capacity rule end to end.
    Demo,
}
