//! eventdesk: event registration with an optimistic query cache.
//!
//! The pure model lives in `eventdesk_core`. This crate adds the async
//! pieces around it: an in-memory [`storage::InMemoryStore`], the
//! [`QueryClient`] cache, notification fan-out, configuration and the CLI.

pub mod cli;
pub mod client;
pub mod config;
pub mod demo;
pub mod notify;
pub mod output;
pub mod storage;

pub use client::{ClientOptions, QueryClient};
pub use config::Config;
