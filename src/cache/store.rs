//! Cache Store Module
//!
//! Concurrent response cache keyed by request path with per-entry TTL.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tracing::debug;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats};
use crate::error::{ClientError, Result};

// == Cache Store ==
/// Thread-safe TTL cache of raw response bodies.
///
/// Lookups take the shared lock, mutations the exclusive one. No lock is held
/// beyond the map access itself, so callers may share a store across tasks
/// and threads freely.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Hit/miss counters
    stats: StatsCounters,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Get ==
    /// Returns the payload for `key` if present and not yet expired.
    ///
    /// An expired entry is reported as absent even though it stays in memory
    /// until [`cleanup_expired`](Self::cleanup_expired) or an overwrite
    /// reclaims it.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        let now = Instant::now();
        let found = self
            .read()
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.payload.clone());

        match found {
            Some(payload) => {
                self.stats.record_hit();
                Some(payload)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Stores `payload` under `key` for `ttl`, replacing any previous entry.
    ///
    /// A zero TTL is rejected rather than stored as an already-dead entry.
    pub fn put(&self, key: impl Into<String>, payload: Bytes, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            return Err(ClientError::InvalidTtl);
        }

        let entry = CacheEntry::new(payload, ttl);
        self.write().insert(key.into(), entry);
        Ok(())
    }

    // == Invalidate ==
    /// Removes `key` whether or not it is present.
    pub fn invalidate(&self, key: &str) {
        self.write().remove(key);
    }

    // == Invalidate Prefix ==
    /// Removes every key equal to `prefix` or extending it at a `/` or `?`
    /// boundary. Returns the number of entries removed.
    ///
    /// `/menu` matches `/menu`, `/menu/rows` and `/menu?x=1`, not `/menus`.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|key, _| !matches_prefix(key, prefix));
        let removed = before - entries.len();

        if removed > 0 {
            debug!(prefix, removed, "invalidated cache entries by prefix");
        }
        removed
    }

    // == Clear ==
    /// Drops every entry under a single exclusive lock.
    pub fn clear(&self) {
        self.write().clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    // == Cleanup Expired ==
    /// Reclaims all expired entries.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of entries physically held, expired ones included.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // No code path panics while holding the lock, so a poisoned lock still
    // guards a consistent map.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn matches_prefix(key: &str, prefix: &str) -> bool {
    match key.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'),
        None => false,
    }
}
