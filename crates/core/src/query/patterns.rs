//! Pure pattern matching functions for query keys.
//!
//! Patterns are colon-separated like the keys they match. A `*` segment
//! matches exactly one key segment, except in last position where it matches
//! zero or more trailing segments. So `events:*` covers both `events` and
//! `events:{id}`.

/// Checks if a rendered query key matches a pattern.
///
/// # Examples
///
/// ```
/// use eventdesk_core::query::pattern_matches;
///
/// assert!(pattern_matches("events", "events"));
/// assert!(pattern_matches("events:*", "events"));
/// assert!(pattern_matches("events:*", "events:1234"));
/// assert!(pattern_matches("*:1234", "attendees:1234"));
/// assert!(!pattern_matches("events:*", "attendees:1234"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split(':').collect();
    let key: Vec<&str> = key.split(':').collect();

    let (last, init) = match pattern.split_last() {
        Some(parts) => parts,
        None => return false,
    };

    if *last == "*" {
        // Trailing wildcard: the key must have every fixed prefix segment.
        key.len() >= init.len() && segments_match(init, &key[..init.len()])
    } else {
        pattern.len() == key.len() && segments_match(&pattern, &key)
    }
}

fn segments_match(pattern: &[&str], key: &[&str]) -> bool {
    pattern
        .iter()
        .zip(key)
        .all(|(p, k)| *p == "*" || p == k)
}
