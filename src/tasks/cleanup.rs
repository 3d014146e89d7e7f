//! Expired Entry Sweep
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedStore;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task sleeps for `interval_secs` between sweeps and holds the store's
/// write lock only for the sweep itself. Abort the returned handle to stop it.
///
/// # Example
/// ```ignore
/// let handle = spawn_cleanup_task(client.store().clone(), 300);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(store: SharedStore, interval_secs: u64) -> JoinHandle<()> {
    spawn_cleanup_task_every(store, Duration::from_secs(interval_secs))
}

/// Same as [`spawn_cleanup_task`] with an arbitrary interval.
pub fn spawn_cleanup_task_every(store: SharedStore, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(?interval, "starting cache sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.write().await.clear_expired();

            if removed > 0 {
                info!(removed, "cache sweep removed expired entries");
            } else {
                debug!("cache sweep found no expired entries");
            }
        }
    })
}
