//! Optimistic mutations.
//!
//! Every mutation runs the same lifecycle:
//!
//! 1. Snapshot the affected keys and write predicted values into them, in
//!    one critical section.
//! 2. Await the store write with the lock released.
//! 3. Commit, or restore the snapshot. Publish a notification either way.
//! 4. Invalidate the keys the write may have changed and refetch the mounted
//!    ones. After a commit, also refetch the keys that got a prediction. After
//!    a rollback, also refetch restored keys that still show another
//!    mutation's placeholder.
//!
//! Failures are caught here: the cache is always reconciled before the error
//! is returned to the caller.

use std::future::Future;

use chrono::Utc;
use uuid::Uuid;

use eventdesk_core::query::{
    optimistic_data, MutationError, MutationKind, MutationRecord, Notification,
    OptimisticContext, QueryKey, Result, Snapshot,
};
use eventdesk_core::registration::{
    temporary_id, Attendee, AttendeeForm, Event, EventForm, EventPatch, EventPatchForm,
    NewAttendee, NewEvent,
};

use super::QueryClient;

impl QueryClient {
    /// Creates an event. The event list shows a placeholder with a temporary
    /// id until the store answers.
    pub async fn create_event(&self, event: NewEvent) -> Result<Event> {
        let store = self.store();
        let kind = MutationKind::CreateEvent(event.clone());
        self.mutate(kind, async move {
            store.create_event(event).await.map_err(MutationError::from)
        })
        .await
    }

    /// Applies a partial update. Fails with [`MutationError::NotFound`] when
    /// the event does not exist.
    pub async fn update_event(&self, id: Uuid, patch: EventPatch) -> Result<Event> {
        let store = self.store();
        let kind = MutationKind::UpdateEvent {
            id,
            patch: patch.clone(),
        };
        let not_found = kind.not_found();
        self.mutate(kind, async move {
            match store.update_event(id, patch).await {
                Ok(Some(event)) => Ok(event),
                Ok(None) => Err(not_found),
                Err(error) => Err(MutationError::from(error)),
            }
        })
        .await
    }

    /// Deletes an event and its attendees.
    ///
    /// Returns `Ok(false)` when there was nothing to delete. That still
    /// counts as a failed mutation: the cache is restored and an error
    /// notification goes out.
    pub async fn delete_event(&self, id: Uuid) -> Result<bool> {
        let store = self.store();
        let kind = MutationKind::DeleteEvent(id);
        let not_found = kind.not_found();
        let outcome = self
            .mutate(kind, async move {
                match store.delete_event(id).await {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(not_found),
                    Err(error) => Err(MutationError::from(error)),
                }
            })
            .await;
        removed(outcome)
    }

    /// Registers an attendee. Fails with the store's capacity error when the
    /// event is full.
    pub async fn create_attendee(&self, attendee: NewAttendee) -> Result<Attendee> {
        let store = self.store();
        let kind = MutationKind::CreateAttendee(attendee.clone());
        self.mutate(kind, async move {
            store
                .create_attendee(attendee)
                .await
                .map_err(MutationError::from)
        })
        .await
    }

    /// Removes an attendee from `event_id`. Returns `Ok(false)` when there
    /// was nothing to remove, after the same rollback as [`delete_event`].
    ///
    /// [`delete_event`]: Self::delete_event
    pub async fn delete_attendee(&self, id: Uuid, event_id: Uuid) -> Result<bool> {
        let store = self.store();
        let kind = MutationKind::DeleteAttendee { id, event_id };
        let not_found = kind.not_found();
        let outcome = self
            .mutate(kind, async move {
                match store.delete_attendee(id).await {
                    Ok(true) => Ok(()),
                    Ok(false) => Err(not_found),
                    Err(error) => Err(MutationError::from(error)),
                }
            })
            .await;
        removed(outcome)
    }

    /// Validates a create form and dispatches it. Invalid input never
    /// reaches the store or the cache.
    pub async fn submit_event(&self, form: &EventForm) -> Result<Event> {
        let event = form.validate()?;
        self.create_event(event).await
    }

    /// Validates an edit form and dispatches it.
    pub async fn submit_event_changes(&self, id: Uuid, form: &EventPatchForm) -> Result<Event> {
        let patch = form.validate()?;
        self.update_event(id, patch).await
    }

    /// Validates a registration form and dispatches it.
    pub async fn register_attendee(&self, event_id: Uuid, form: &AttendeeForm) -> Result<Attendee> {
        let attendee = form.validate(event_id)?;
        self.create_attendee(attendee).await
    }

    async fn mutate<T, W>(&self, kind: MutationKind, write: W) -> Result<T>
    where
        W: Future<Output = Result<T>>,
    {
        let (mut record, predicted) = self.apply_optimistic(kind).await;
        tracing::debug!(
            mutation_id = record.id(),
            mutation = record.kind().name(),
            predicted = predicted.len(),
            "mutation dispatched"
        );

        let outcome = write.await;

        self.conclude(&mut record, predicted, outcome.as_ref().err()).await;
        outcome
    }

    /// Snapshots the affected keys and writes the predicted values.
    ///
    /// Returns the pending record and the keys that received a prediction.
    async fn apply_optimistic(&self, kind: MutationKind) -> (MutationRecord, Vec<QueryKey>) {
        let id = self.next_mutation_id();
        let ctx = OptimisticContext {
            temp_id: temporary_id(self.next_temporary_seq()),
            now: Utc::now(),
        };
        let keys = kind.affected_keys();

        let mut cache = self.lock().await;
        let snapshot = Snapshot::capture(&keys, |key| cache.peek(key).cloned());
        let mut predicted = Vec::with_capacity(keys.len());
        for key in &keys {
            let current = cache.peek(key).and_then(|state| state.data.as_ref());
            if let Some(data) = optimistic_data(&kind, key, current, &ctx) {
                cache.apply_optimistic(key, data);
                predicted.push(key.clone());
            }
        }
        drop(cache);

        (MutationRecord::begin(id, kind, snapshot), predicted)
    }

    /// Commits or rolls back `record`, publishes the outcome, and settles.
    ///
    /// The cache is settled even if the record refuses the transition.
    async fn conclude(
        &self,
        record: &mut MutationRecord,
        predicted: Vec<QueryKey>,
        failure: Option<&MutationError>,
    ) {
        let kind = record.kind().clone();
        let refetch = match failure {
            None => {
                match record.commit() {
                    Ok(()) => tracing::info!(
                        mutation_id = record.id(),
                        mutation = kind.name(),
                        "mutation committed"
                    ),
                    Err(refused) => {
                        tracing::error!(mutation_id = record.id(), error = %refused, "commit refused");
                    }
                }
                self.notifications().publish(Notification::succeeded(&kind));
                predicted
            }
            Some(error) => {
                let unsettled = match record.roll_back() {
                    Ok(snapshot) => self.roll_back(&snapshot).await,
                    Err(refused) => {
                        tracing::error!(mutation_id = record.id(), error = %refused, "rollback refused");
                        Vec::new()
                    }
                };
                tracing::warn!(
                    mutation_id = record.id(),
                    mutation = kind.name(),
                    error = %error,
                    unsettled = unsettled.len(),
                    "mutation rolled back"
                );
                self.notifications().publish(Notification::failed(&kind, error));
                unsettled
            }
        };

        self.settle(&kind, refetch).await;
    }

    /// Restores `snapshot` and returns the keys it could not bring back to a
    /// settled value.
    async fn roll_back(&self, snapshot: &Snapshot) -> Vec<QueryKey> {
        self.lock().await.restore(snapshot)
    }

    /// Invalidates what the mutation may have changed, then refetches the
    /// mounted matches together with `refetch`.
    async fn settle(&self, kind: &MutationKind, mut refetch: Vec<QueryKey>) {
        {
            let mut cache = self.lock().await;
            for pattern in kind.invalidation_patterns() {
                refetch.extend(cache.invalidate(&pattern));
            }
        }
        self.refetch_all(refetch).await;
    }
}

/// Maps a delete outcome onto the `bool` the store reports.
fn removed(outcome: Result<()>) -> Result<bool> {
    match outcome {
        Ok(()) => Ok(true),
        Err(MutationError::NotFound { .. }) => Ok(false),
        Err(error) => Err(error),
    }
}
