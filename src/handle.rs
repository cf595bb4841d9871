//! Cache Handle Module
//!
//! [`RingCache`] is the public face of a cache instance: it owns the
//! synchronous store behind an `Arc<RwLock>` together with the handle of
//! the periodic sweep task, and keeps the scheduler honest - started
//! idempotently on insert, stopped when the cache drains, aborted when
//! the cache is dropped.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::tasks::spawn_sweep_task;

// == Ring Cache ==
/// A shared, self-sweeping ring cache.
pub struct RingCache<K, V> {
    store: Arc<RwLock<CacheStore<K, V>>>,
    /// Interval between sweep ticks (half the TTL)
    period: Duration,
    /// Handle of the active sweep task, if any. A finished task counts as
    /// inactive, so the sweep restarts on the next insert.
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<K, V> RingCache<K, V>
where
    K: Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache from a configuration. No sweep task runs until the
    /// first insertion.
    pub fn new(config: CacheConfig<K>) -> Self {
        let period = config.sweep_period();
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(config))),
            period,
            sweeper: Mutex::new(None),
        }
    }

    /// Creates a cache with default configuration.
    pub fn with_defaults() -> Self
    where
        K: PartialEq,
    {
        Self::new(CacheConfig::default())
    }

    // == Get ==
    /// Looks up a key; `None` reports a miss.
    pub async fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.store.write().await.get(key)
    }

    // == Set ==
    /// Inserts a mapping and makes sure the periodic sweep is running.
    /// Always succeeds.
    pub async fn set(&self, key: K, value: V) -> bool {
        let accepted = self.store.write().await.set(key, value);
        self.ensure_sweeping();
        accepted
    }

    // == Validate ==
    /// Runs the temporal sweep out-of-band; stops the scheduler if the
    /// sweep leaves the cache empty.
    pub async fn validate(&self) {
        let empty = {
            let mut store = self.store.write().await;
            store.validate();
            store.is_empty()
        };
        if empty {
            self.stop_sweeping();
        }
    }

    // == Accessors ==
    /// Current live entry count.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Snapshot of the performance counters.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Key of the entry the cursor currently anchors on, if any.
    pub async fn cursor_key(&self) -> Option<K>
    where
        K: Clone,
    {
        self.store.read().await.cursor_key().cloned()
    }

    // == Scheduler ==
    /// Starts the periodic sweep if it is not already running. Returns
    /// whether this call actually spawned a task; a second call while one
    /// is live is a no-op.
    pub fn ensure_sweeping(&self) -> bool {
        let mut sweeper = self.sweeper.lock().expect("sweeper mutex poisoned");
        match sweeper.as_ref() {
            Some(handle) if !handle.is_finished() => false,
            _ => {
                *sweeper = Some(spawn_sweep_task(Arc::clone(&self.store), self.period));
                true
            }
        }
    }

    /// Whether a sweep task is currently live.
    pub fn is_sweeping(&self) -> bool {
        let sweeper = self.sweeper.lock().expect("sweeper mutex poisoned");
        matches!(sweeper.as_ref(), Some(handle) if !handle.is_finished())
    }

    /// Aborts the sweep task if one is running; a no-op otherwise.
    pub fn stop_sweeping(&self) {
        let handle = self.sweeper.lock().expect("sweeper mutex poisoned").take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

// Disposing the cache must not leave a periodic task ticking against it.
impl<K, V> Drop for RingCache<K, V> {
    fn drop(&mut self) {
        if let Ok(mut sweeper) = self.sweeper.lock() {
            if let Some(handle) = sweeper.take() {
                handle.abort();
            }
        }
    }
}
