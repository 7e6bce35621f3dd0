//! Client-side query cache model: keys, per-key state, optimistic updates
//! and the mutation lifecycle. Everything here is pure; the async cache that
//! drives it lives in the `eventdesk` crate.

mod error;
mod keys;
mod mutation;
mod notification;
mod optimistic;
mod patterns;
mod snapshot;
mod state;

pub use error::{MutationError, Result};
pub use keys::{attendees_pattern, events_pattern, QueryKey};
pub use mutation::{MutationKind, MutationPhase, MutationRecord};
pub use notification::{Notification, NotificationLevel};
pub use optimistic::{optimistic_data, OptimisticContext};
pub use patterns::pattern_matches;
pub use snapshot::Snapshot;
pub use state::{FetchClock, QueryData, QueryState, QueryStatus};
