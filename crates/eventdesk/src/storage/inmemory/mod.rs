//! In-memory storage backend.
//!
//! Events and attendees live in insertion-ordered vectors behind a single
//! `Arc<RwLock<_>>`, so multi-collection operations (capacity-checked
//! registration, cascading delete) happen under one write lock.
//!
//! # Example
//!
//! ```rust,ignore
//! use eventdesk::storage::InMemoryStore;
//!
//! let store = InMemoryStore::seeded();
//! let events = store.list_events().await?;
//! ```

mod repository;

pub use repository::{InMemoryStore, Latency};
