use std::{env, time::Duration};

use crate::storage::Latency;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Store delay for event lists and writes, in milliseconds (default: 300)
    pub latency_ms: u64,
    /// Store delay for single event and attendee reads, in milliseconds (default: 200)
    pub lookup_latency_ms: u64,
    /// How long a fetched query counts as fresh, in milliseconds (default: 0)
    pub stale_time_ms: u64,
    /// Maximum number of cached query keys (default: 1,000)
    pub cache_max_entries: usize,
    /// Notifications buffered per subscriber (default: 100)
    pub notification_capacity: usize,
    /// Seed the store with the demo events (default: true)
    pub seed: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `EVENTDESK_LATENCY_MS` - List and write delay (default: 300)
    /// - `EVENTDESK_LOOKUP_LATENCY_MS` - Single read delay (default: 200)
    /// - `EVENTDESK_STALE_TIME_MS` - Query stale time (default: 0)
    /// - `EVENTDESK_CACHE_MAX_ENTRIES` - Cached query keys (default: 1,000)
    /// - `EVENTDESK_NOTIFICATION_CAPACITY` - Notification buffer (default: 100)
    /// - `EVENTDESK_SEED` - Seed demo data, `true` or `false` (default: true)
    pub fn from_env() -> Self {
        Self {
            latency_ms: parse_var("EVENTDESK_LATENCY_MS").unwrap_or(300),
            lookup_latency_ms: parse_var("EVENTDESK_LOOKUP_LATENCY_MS").unwrap_or(200),
            stale_time_ms: parse_var("EVENTDESK_STALE_TIME_MS").unwrap_or(0),
            cache_max_entries: parse_var("EVENTDESK_CACHE_MAX_ENTRIES").unwrap_or(1_000),
            notification_capacity: parse_var("EVENTDESK_NOTIFICATION_CAPACITY").unwrap_or(100),
            seed: parse_var("EVENTDESK_SEED").unwrap_or(true),
        }
    }

    /// Store latency as configured.
    pub fn latency(&self) -> Latency {
        Latency::from_millis(self.latency_ms, self.lookup_latency_ms)
    }

    /// Get stale time as a Duration.
    pub fn stale_time(&self) -> Duration {
        Duration::from_millis(self.stale_time_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
