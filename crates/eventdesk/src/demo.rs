//! Scripted walk-through of the optimistic cache against a live store.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::broadcast::error::TryRecvError;

use eventdesk_core::query::{MutationError, Notification, QueryKey};
use eventdesk_core::registration::{
    is_temporary_id, Attendee, Event, EventWithAttendees, NewAttendee, NewEvent,
};
use eventdesk_core::store::StoreError;

use crate::client::QueryClient;
use crate::output::{pretty, Pretty};

/// Polls attempted while waiting for the optimistic placeholder.
const PLACEHOLDER_POLLS: usize = 16;

/// What the demo observed at each step.
#[derive(Debug, Clone, Serialize)]
pub struct DemoReport {
    /// The event as the list showed it before the store answered.
    pub placeholder: Option<EventWithAttendees>,
    pub created: Event,
    pub registered: Attendee,
    /// Message of the rejected second registration.
    pub rejected: String,
    /// Attendees of the demo event after everything settled.
    pub attendees: Vec<Attendee>,
    pub notifications: Vec<Notification>,
}

impl Pretty for DemoReport {
    fn pretty(&self) -> String {
        let mut output = String::new();
        if let Some(placeholder) = &self.placeholder {
            output.push_str(&format!("Optimistic:\n{}\n\n", pretty::format_event(placeholder)));
        }
        let created = EventWithAttendees::from_parts(self.created.clone(), self.attendees.clone());
        output.push_str(&format!("Settled:\n{}\n\n", pretty::format_event(&created)));
        output.push_str(&format!("Second registration rejected: {}\n\n", self.rejected));
        output.push_str(&pretty::format_attendees(&self.attendees));
        output
    }
}

/// Creates a one-seat event, fills it, and tries to overbook it.
pub async fn run_demo(client: &QueryClient) -> Result<DemoReport> {
    let mut notifications = client.subscribe();
    client.mount(QueryKey::Events).await;

    let new_event = NewEvent {
        title: "Rust Office Hours".to_string(),
        description: "One seat, first come first served.".to_string(),
        date: NaiveDate::from_ymd_opt(2025, 5, 6)
            .and_then(|date| date.and_hms_opt(17, 0, 0))
            .unwrap_or_default(),
        capacity: 1,
    };
    let (created, placeholder) = tokio::join!(
        client.create_event(new_event),
        observe_placeholder(client)
    );
    let created = created?;
    tracing::info!(event_id = %created.id, placeholder = placeholder.is_some(), "demo event created");

    let attendees_key = QueryKey::Attendees(created.id);
    client.mount(attendees_key.clone()).await;

    let registered = client
        .create_attendee(NewAttendee {
            event_id: created.id,
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        })
        .await?;

    let rejected = match client
        .create_attendee(NewAttendee {
            event_id: created.id,
            name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
        })
        .await
    {
        Err(error @ MutationError::Store(StoreError::CapacityExceeded { .. })) => error.to_string(),
        Err(error) => return Err(error.into()),
        Ok(attendee) => bail!("registration {} was accepted past capacity", attendee.id),
    };

    let attendees = client
        .peek(&attendees_key)
        .await
        .and_then(|state| state.attendees().map(<[Attendee]>::to_vec))
        .unwrap_or_default();

    let mut received = Vec::new();
    loop {
        match notifications.try_recv() {
            Ok(notification) => received.push(notification),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "demo missed notifications");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }

    Ok(DemoReport {
        placeholder,
        created,
        registered,
        rejected,
        attendees,
        notifications: received,
    })
}

/// Waits for a temporary-id event to show up in the cached list.
async fn observe_placeholder(client: &QueryClient) -> Option<EventWithAttendees> {
    for _ in 0..PLACEHOLDER_POLLS {
        tokio::task::yield_now().await;
        let placeholder = client.peek(&QueryKey::Events).await.and_then(|state| {
            state
                .events()
                .and_then(|events| events.iter().find(|event| is_temporary_id(event.id())).cloned())
        });
        if placeholder.is_some() {
            return placeholder;
        }
    }
    None
}
