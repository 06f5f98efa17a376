//! TTL Cleanup Task
//!
//! Background task that periodically reclaims expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically reclaims expired entries.
///
/// Expired entries are already invisible to readers; this only returns their
/// memory. The task loops forever, so keep the handle and abort it on
/// shutdown.
///
/// # Example
/// ```ignore
/// let client = RemoteClient::new(config)?;
/// let cleanup_handle = spawn_cleanup_task(client.cache().clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: Arc<CacheStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "starting cache cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired();
            let stats = cache.stats();

            if removed > 0 {
                info!(
                    removed,
                    remaining = stats.total_entries,
                    hit_rate = stats.hit_rate(),
                    "cache cleanup: reclaimed expired entries"
                );
            } else {
                debug!(
                    entries = stats.total_entries,
                    hit_rate = stats.hit_rate(),
                    "cache cleanup: no expired entries found"
                );
            }
        }
    })
}
