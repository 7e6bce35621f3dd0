use thiserror::Error;
use uuid::Uuid;

/// Errors reported by an event store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Event is at full capacity")]
    CapacityExceeded { event_id: Uuid, capacity: u32 },
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
