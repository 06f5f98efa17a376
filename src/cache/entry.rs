//! Cache Entry Module
//!
//! Defines a single cached response body with its expiry deadline.

use std::time::{Duration, Instant};

use bytes::Bytes;

// == Cache Entry ==
/// A cached response body and the instant it stops being visible.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored response body
    pub payload: Bytes,
    /// Deadline after which the entry is treated as absent
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` from now.
    pub fn new(payload: Bytes, ttl: Duration) -> Self {
        Self {
            payload,
            expires_at: Instant::now() + ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so it
    /// is never served at or after its deadline.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(Bytes::from_static(b"[]"), Duration::from_secs(60));

        assert_eq!(entry.payload, Bytes::from_static(b"[]"));
        assert!(!entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(Bytes::from_static(b"[]"), Duration::from_millis(50));

        assert!(!entry.is_expired_at(Instant::now()));

        sleep(Duration::from_millis(80));

        assert!(entry.is_expired_at(Instant::now()));
    }

    #[test]
    fn test_deadline_is_ttl_from_creation() {
        let before = Instant::now();
        let entry = CacheEntry::new(Bytes::new(), Duration::from_secs(10));

        assert!(entry.expires_at >= before + Duration::from_secs(10));
        assert!(!entry.is_expired_at(before + Duration::from_secs(9)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry {
            payload: Bytes::new(),
            expires_at: now,
        };

        // Entry should be expired when current time >= expires_at
        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
        assert!(!entry.is_expired_at(now - Duration::from_millis(1)));
    }
}
