//! Periodic Sweep Task
//!
//! Background task that periodically runs the cache's temporal sweep. The
//! task is self-stopping: once a sweep leaves the cache empty there is
//! nothing left to age out, so the task exits and the next insertion
//! spawns a fresh one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns the periodic sweep for one cache instance.
///
/// Every `period` (half the TTL, see `CacheConfig::sweep_period`) the task
/// takes the write lock and runs `validate`. Ticks never overlap: the loop
/// is sequential and the lock serializes the sweep against client calls.
///
/// Returns the task handle so the owner can abort it on disposal.
pub fn spawn_sweep_task<K, V>(
    store: Arc<RwLock<CacheStore<K, V>>>,
    period: Duration,
) -> JoinHandle<()>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        debug!(?period, "sweep task started");

        loop {
            tokio::time::sleep(period).await;

            let empty = {
                let mut store = store.write().await;
                store.validate();
                store.is_empty()
            };

            if empty {
                info!("sweep task stopping: cache is empty");
                break;
            }
            debug!("sweep tick complete");
        }
    })
}
