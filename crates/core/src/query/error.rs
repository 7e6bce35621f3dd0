use thiserror::Error;
use uuid::Uuid;

use crate::registration::ValidationErrors;
use crate::store::StoreError;

use super::mutation::MutationPhase;

/// Errors surfaced by a mutation after it has settled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Rejected before dispatch; the store never saw the input.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The store reported that the target record does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: Uuid },
    #[error("Mutation {id} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        id: u64,
        from: MutationPhase,
        to: MutationPhase,
    },
}

/// Result type for mutations.
pub type Result<T> = std::result::Result<T, MutationError>;
