//! Storage backends implementing `eventdesk_core::store::EventStore`.
//!
//! Only the in-memory backend exists today. It simulates a remote service by
//! sleeping before each operation.

pub mod inmemory;

pub use inmemory::{InMemoryStore, Latency};
