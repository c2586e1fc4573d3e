//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that removes expired cache entries every
/// `interval`.
///
/// Expired entries are also dropped lazily on lookup; the sweep only reclaims
/// memory for keys nobody reads again.
///
/// # Returns
/// A JoinHandle for the spawned task, used to abort it during shutdown.
pub fn spawn_cleanup_task(cache: Arc<CacheStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "Starting TTL cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired();
            if removed > 0 {
                info!(removed, "TTL cleanup removed expired entries");
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachedValue;

    const SWEEP: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = Arc::new(CacheStore::new());
        cache.store(
            "all-products",
            CachedValue::Products(Vec::new()),
            Duration::from_millis(20),
        );

        let handle = spawn_cleanup_task(cache.clone(), SWEEP);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.len(), 0, "Expired entry should have been swept");
        assert_eq!(cache.stats().expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_live_entries() {
        let cache = Arc::new(CacheStore::new());
        cache.store(
            "all-products",
            CachedValue::Products(Vec::new()),
            Duration::from_secs(3600),
        );

        let handle = spawn_cleanup_task(cache.clone(), SWEEP);
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.contains("all-products"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let handle = spawn_cleanup_task(Arc::new(CacheStore::new()), SWEEP);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
