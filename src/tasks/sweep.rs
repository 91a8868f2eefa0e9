//! TTL Sweep Task
//!
//! Background task that periodically removes expired entries from every
//! shard. Lazy expiry on `get` keeps the cache correct without it; the sweep
//! only reclaims memory held by entries nobody reads again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cluster::CacheCoordinator;

/// Handle to a running sweep task.
#[derive(Debug)]
pub struct SweepHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SweepHandle {
    /// Stops taking new ticks and waits for an in-flight sweep to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(err) = self.join.await {
            debug!("sweep task ended abnormally: {}", err);
        }
    }
}

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// Each sweep runs synchronously between two await points, so a shutdown
/// request never interrupts a shard mid-cleanup.
///
/// # Example
/// ```ignore
/// let coordinator = Arc::new(CacheCoordinator::from_config(&config)?);
/// let sweeper = spawn_sweep_task(coordinator.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.shutdown().await;
/// ```
pub fn spawn_sweep_task<V>(coordinator: Arc<CacheCoordinator<V>>, interval: Duration) -> SweepHandle
where
    V: Clone + Send + Sync + 'static,
{
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    let join = tokio::spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let removed = coordinator.sweep_expired();
                    if removed > 0 {
                        info!("TTL sweep: removed {} expired entries", removed);
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
            }
        }

        info!("TTL sweep task stopped");
    });

    SweepHandle { shutdown, join }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ShardStore;
    use crate::cluster::CoordinatorConfig;

    fn coordinator() -> Arc<CacheCoordinator<String>> {
        let coordinator = CacheCoordinator::new(CoordinatorConfig::default());
        coordinator.add_shard("s0", ShardStore::new(100)).unwrap();
        coordinator.add_shard("s1", ShardStore::new(100)).unwrap();
        Arc::new(coordinator)
    }

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let cache = coordinator();
        cache
            .set("expire_soon", "value".to_string(), Some(Duration::from_millis(50)))
            .unwrap();

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(100));
        tokio::time::sleep(Duration::from_millis(350)).await;

        let stats = cache.stats();
        assert_eq!(stats.totals.total_entries, 0, "expired entry should be swept");
        assert_eq!(stats.totals.expirations, 1);
        assert_eq!(stats.totals.misses, 0, "sweep must not count as a read");

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_valid_entries() {
        let cache = coordinator();
        cache
            .set("long_lived", "value".to_string(), Some(Duration::from_secs(3600)))
            .unwrap();

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.get("long_lived").unwrap(), Some("value".to_string()));
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_sweep_task_stops_on_shutdown() {
        let handle = spawn_sweep_task(coordinator(), Duration::from_secs(3600));

        tokio::time::timeout(Duration::from_secs(1), handle.shutdown())
            .await
            .expect("shutdown should not wait for the next tick");
    }
}
