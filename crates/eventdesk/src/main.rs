//! eventdesk CLI entry point.

use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use eventdesk::cli::{attendees::AttendeesAction, events::EventsAction, Cli, Commands};
use eventdesk::demo::run_demo;
use eventdesk::output::{format_output, Pretty};
use eventdesk::storage::{InMemoryStore, Latency};
use eventdesk::{ClientOptions, Config, QueryClient};
use eventdesk_core::query::{Notification, QueryState};
use eventdesk_core::registration::{
    AttendeeForm, DashboardStats, EventForm, EventPatchForm, EventWithAttendees,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventdesk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let store = if config.seed {
        InMemoryStore::seeded()
    } else {
        InMemoryStore::new()
    };
    let latency = if cli.no_latency {
        Latency::none()
    } else {
        config.latency()
    };
    tracing::debug!(?latency, seed = config.seed, "store ready");

    let client = QueryClient::new(
        Arc::new(store.with_latency(latency)),
        ClientOptions::from(&config),
    );
    let printer =
        (!cli.quiet).then(|| tokio::spawn(print_notifications(client.notifications().stream())));

    let result = run(&cli, &client).await;

    // Dropping the last client closes the notification stream.
    drop(client);
    if let Some(printer) = printer {
        if let Err(error) = printer.await {
            tracing::warn!(error = %error, "notification printer failed");
        }
    }
    result
}

async fn run(cli: &Cli, client: &QueryClient) -> Result<()> {
    let format = cli.format;
    match &cli.command {
        Commands::Events(events_cmd) => match &events_cmd.action {
            EventsAction::List => {
                let events = load_events(client).await?;
                println!("{}", format_output(&events, format));
            }
            EventsAction::Get { id } => {
                let event = load_event(client, *id).await?;
                println!("{}", format_output(&event, format));
            }
            EventsAction::Create {
                title,
                description,
                date,
                capacity,
            } => {
                let form = EventForm::new(title, description, date, *capacity);
                let event = client.submit_event(&form).await?;
                let event = EventWithAttendees::from_parts(event, Vec::new());
                println!("{}", format_output(&event, format));
            }
            EventsAction::Update {
                id,
                title,
                description,
                date,
                capacity,
            } => {
                let form = EventPatchForm {
                    title: title.clone(),
                    description: description.clone(),
                    date: date.clone(),
                    capacity: capacity.map(f64::from),
                };
                let event = client.submit_event_changes(*id, &form).await?;
                let event = load_event(client, event.id).await?;
                println!("{}", format_output(&event, format));
            }
            EventsAction::Delete { id } => {
                if !client.delete_event(*id).await? {
                    bail!("Event not found: {}", id);
                }
                if !cli.quiet {
                    println!("Deleted event {}", id);
                }
            }
            EventsAction::Stats => {
                let stats = DashboardStats::from_events(&load_events(client).await?);
                println!("{}", format_output(&stats, format));
            }
        },
        Commands::Attendees(attendees_cmd) => match &attendees_cmd.action {
            AttendeesAction::List { event_id } => {
                let state = loaded(client.attendees(Some(*event_id)).await)?;
                let attendees = state.attendees().unwrap_or_default();
                println!("{}", format_output(attendees, format));
            }
            AttendeesAction::Register {
                event_id,
                name,
                email,
            } => {
                let form = AttendeeForm::new(name, email);
                let attendee = client.register_attendee(*event_id, &form).await?;
                println!("{}", format_output(&attendee, format));
            }
            AttendeesAction::Remove {
                event_id,
                attendee_id,
            } => {
                if !client.delete_attendee(*attendee_id, *event_id).await? {
                    bail!("Attendee not found: {}", attendee_id);
                }
                if !cli.quiet {
                    println!("Removed attendee {} from event {}", attendee_id, event_id);
                }
            }
        },
        Commands::Demo => {
            let report = run_demo(client).await?;
            println!("{}", format_output(&report, format));
        }
    }
    Ok(())
}

async fn load_event(client: &QueryClient, id: Uuid) -> Result<EventWithAttendees> {
    let state = loaded(client.event(Some(id)).await)?;
    match state.event() {
        Some(event) => Ok(event.clone()),
        None => bail!("Event not found: {}", id),
    }
}

async fn load_events(client: &QueryClient) -> Result<Vec<EventWithAttendees>> {
    let state = loaded(client.events().await)?;
    Ok(state.events().unwrap_or_default().to_vec())
}

/// Turns a failed query into an error.
fn loaded(state: QueryState) -> Result<QueryState> {
    if state.is_error() {
        bail!(state.error.unwrap_or_else(|| "query failed".to_string()));
    }
    Ok(state)
}

async fn print_notifications(mut notifications: BroadcastStream<Notification>) {
    while let Some(notification) = notifications.next().await {
        match notification {
            Ok(notification) => eprintln!("{}", notification.pretty()),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notifications dropped");
            }
        }
    }
}
