//! Cache Entry Module
//!
//! Defines the record stored for each key, with its expiry deadline.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cache record: key, value and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    /// The key this entry is indexed under
    pub key: K,
    /// The stored value
    pub value: V,
    /// Absolute deadline; the entry is expired from this instant on
    pub expires_at: Instant,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an entry that expires `ttl` after `now`.
    pub fn new(key: K, value: V, now: Instant, ttl: Duration) -> Self {
        Self {
            key,
            value,
            expires_at: deadline(now, ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: the entry is expired once `now` reaches the
    /// deadline, so an entry read exactly at its deadline is already gone.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the time left before expiry, or zero once expired.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }

    /// Restarts the TTL from `now`.
    pub fn refresh(&mut self, now: Instant, ttl: Duration) {
        self.expires_at = deadline(now, ttl);
    }
}

/// `now + ttl`, saturating for TTLs too large to represent as an `Instant`.
fn deadline(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl)
        .unwrap_or_else(|| now + Duration::from_secs(u32::MAX as u64))
}
