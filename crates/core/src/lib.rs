//! Pure domain logic for eventdesk: registration types and validation, the
//! event store contract, and the query cache model.

pub mod query;
pub mod registration;
pub mod serde;
pub mod store;
