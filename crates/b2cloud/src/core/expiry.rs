use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Absolute expiry of a record issued at `now` and trusted for `ttl`.
///
/// Saturates at the maximum representable timestamp.
pub fn expires_after(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whether an entry stored at `stored_at` is still inside `ttl`.
/// A missing ttl never expires.
pub fn is_fresh(stored_at: Instant, ttl: Option<Duration>) -> bool {
    match ttl {
        Some(ttl) => stored_at.elapsed() < ttl,
        None => true,
    }
}
