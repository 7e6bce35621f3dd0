//! Mutation descriptions and their lifecycle.
//!
//! A [`MutationKind`] says what a write does and which cached views it
//! touches. A [`MutationRecord`] tracks one dispatched write from its
//! optimistic apply to its outcome: `Pending -> {Committed | RolledBack}`.

use uuid::Uuid;

use crate::registration::{EventPatch, NewAttendee, NewEvent};

use super::error::{MutationError, Result};
use super::keys::{attendees_pattern, events_pattern, QueryKey};
use super::snapshot::Snapshot;

/// A write against the store, with everything needed to predict its effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    CreateEvent(NewEvent),
    UpdateEvent { id: Uuid, patch: EventPatch },
    DeleteEvent(Uuid),
    CreateAttendee(NewAttendee),
    DeleteAttendee { id: Uuid, event_id: Uuid },
}

impl MutationKind {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            MutationKind::CreateEvent(_) => "create_event",
            MutationKind::UpdateEvent { .. } => "update_event",
            MutationKind::DeleteEvent(_) => "delete_event",
            MutationKind::CreateAttendee(_) => "create_attendee",
            MutationKind::DeleteAttendee { .. } => "delete_attendee",
        }
    }

    /// Keys whose cached value is predicted during the optimistic apply.
    pub fn affected_keys(&self) -> Vec<QueryKey> {
        match self {
            MutationKind::CreateEvent(_) => vec![QueryKey::Events],
            MutationKind::UpdateEvent { id, .. } => vec![QueryKey::Events, QueryKey::Event(*id)],
            MutationKind::DeleteEvent(id) => vec![
                QueryKey::Events,
                QueryKey::Event(*id),
                QueryKey::Attendees(*id),
            ],
            MutationKind::CreateAttendee(NewAttendee { event_id, .. })
            | MutationKind::DeleteAttendee { event_id, .. } => vec![
                QueryKey::Attendees(*event_id),
                QueryKey::Events,
                QueryKey::Event(*event_id),
            ],
        }
    }

    /// Patterns invalidated once the mutation settles, whatever the outcome.
    ///
    /// Attendee writes also invalidate the event views because attendee
    /// counts are derived there.
    pub fn invalidation_patterns(&self) -> Vec<String> {
        match self {
            MutationKind::CreateEvent(_) | MutationKind::UpdateEvent { .. } => {
                vec![events_pattern()]
            }
            MutationKind::DeleteEvent(id) => vec![events_pattern(), attendees_pattern(*id)],
            MutationKind::CreateAttendee(NewAttendee { event_id, .. })
            | MutationKind::DeleteAttendee { event_id, .. } => {
                vec![attendees_pattern(*event_id), events_pattern()]
            }
        }
    }

    /// Entity named in not-found errors.
    pub fn entity_type(&self) -> &'static str {
        match self {
            MutationKind::CreateEvent(_)
            | MutationKind::UpdateEvent { .. }
            | MutationKind::DeleteEvent(_) => "Event",
            MutationKind::CreateAttendee(_) | MutationKind::DeleteAttendee { .. } => "Attendee",
        }
    }

    /// Id of the record the mutation targets, when it already exists.
    pub fn target_id(&self) -> Option<Uuid> {
        match self {
            MutationKind::CreateEvent(_) | MutationKind::CreateAttendee(_) => None,
            MutationKind::UpdateEvent { id, .. }
            | MutationKind::DeleteEvent(id)
            | MutationKind::DeleteAttendee { id, .. } => Some(*id),
        }
    }

    /// Builds the not-found error for this mutation's target.
    pub fn not_found(&self) -> MutationError {
        MutationError::NotFound {
            entity_type: self.entity_type(),
            id: self.target_id().unwrap_or_default(),
        }
    }
}

/// Where a dispatched mutation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    /// Optimistic value applied, write in flight.
    Pending,
    /// Write succeeded; the snapshot is no longer needed.
    Committed,
    /// Write failed; the snapshot has been handed back for restore.
    RolledBack,
}

/// One dispatched mutation and the cache snapshot taken before it ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    id: u64,
    kind: MutationKind,
    phase: MutationPhase,
    snapshot: Option<Snapshot>,
}

impl MutationRecord {
    /// Starts a mutation in the `Pending` phase.
    pub fn begin(id: u64, kind: MutationKind, snapshot: Snapshot) -> Self {
        Self {
            id,
            kind,
            phase: MutationPhase::Pending,
            snapshot: Some(snapshot),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> &MutationKind {
        &self.kind
    }

    pub fn phase(&self) -> MutationPhase {
        self.phase
    }

    /// The snapshot, while the mutation can still roll back.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// `Pending -> Committed`. Drops the snapshot.
    pub fn commit(&mut self) -> Result<()> {
        self.transition(MutationPhase::Committed)?;
        self.snapshot = None;
        Ok(())
    }

    /// `Pending -> RolledBack`. Returns the snapshot to restore.
    pub fn roll_back(&mut self) -> Result<Snapshot> {
        self.transition(MutationPhase::RolledBack)?;
        Ok(self.snapshot.take().unwrap_or_default())
    }

    fn transition(&mut self, to: MutationPhase) -> Result<()> {
        if self.phase != MutationPhase::Pending {
            return Err(MutationError::InvalidTransition {
                id: self.id,
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }
}
