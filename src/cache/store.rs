//! Cache Store Module
//!
//! The synchronous cache engine: cursor-driven lookup and insertion on top
//! of the ring, size-bound eviction, and the temporal sweep. Recency here
//! is cursor-centric rather than globally ordered: inserts splice in next
//! to wherever the cursor sits, and under capacity pressure the entry now
//! left of the cursor is evicted, which is not necessarily the globally
//! oldest entry. That is a design trait, not a bug.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::ring::{Direction, NodeId, Ring};
use crate::cache::CacheStats;
use crate::config::{CacheConfig, KeyComparator};
use crate::diag::DiagnosticSink;

// == Cache Store ==
/// Fixed-capacity ring cache with TTL sweeping.
pub struct CacheStore<K, V> {
    /// Diagnostic label
    name: String,
    /// Maximum number of live entries
    capacity: usize,
    /// Age past which an entry is eligible for sweep invalidation
    ttl: Duration,
    /// Key-equality predicate
    comparator: KeyComparator<K>,
    /// Diagnostic sink (no-op capable)
    sink: Arc<dyn DiagnosticSink>,
    /// The entry ring
    ring: Ring<K, V>,
    /// Anchor for the next insertion and origin of the next lookup
    cursor: Option<NodeId>,
    /// Holder of the most recent touch across the whole cache; if the
    /// sweep finds this entry stale, everything older is stale too and
    /// the cache resets wholesale
    latest: Option<NodeId>,
    /// Live entry count, recomputed by the sweep
    len: usize,
    /// Performance counters
    stats: CacheStats,
}

impl<K, V> CacheStore<K, V> {
    // == Constructor ==
    /// Creates an empty store from a configuration.
    ///
    /// Capacity is clamped to at least 1 so eviction always has a victim
    /// distinct from the freshly inserted entry.
    pub fn new(config: CacheConfig<K>) -> Self {
        let store = Self {
            name: config.name,
            capacity: config.capacity.max(1),
            ttl: config.ttl,
            comparator: config.comparator,
            sink: config.sink,
            ring: Ring::new(),
            cursor: None,
            latest: None,
            len: 0,
            stats: CacheStats::new(),
        };
        store.diag("init", || {
            format!(
                "capacity {} ttl {:?}",
                store.capacity, store.ttl
            )
        });
        store
    }

    // == Get ==
    /// Looks a key up by searching outward from the cursor in alternating
    /// directions, nearest ring neighbors first.
    ///
    /// On a match the entry's stale flag is cleared, its touch-time
    /// refreshes, and the cursor moves to it, so the next insertion is
    /// anchored there. A miss leaves all state unchanged.
    pub fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let now = Instant::now();

        let mut found = None;
        let mut traversals = 0usize;
        if let Some(cursor) = self.cursor {
            for id in self.ring.iter_outward(cursor) {
                if (self.comparator)(key, &self.ring.node(id).key) {
                    found = Some(id);
                    break;
                }
                traversals += 1;
            }
        }

        match found {
            Some(id) => {
                let entry = self.ring.node_mut(id);
                entry.stale = false;
                entry.last_touched = now;
                self.cursor = Some(id);
                self.latest = Some(id);
                self.stats.record_hit();
                self.diag("get", || format!("hit after {traversals} traversals"));
                Some(self.ring.node(id).value.clone())
            }
            None => {
                self.stats.record_miss();
                self.diag("get", || "miss".to_string());
                None
            }
        }
    }

    // == Set ==
    /// Inserts a mapping next to the cursor and advances the cursor to it.
    ///
    /// If the insertion would exceed capacity, the entry now left of the
    /// cursor (the slot the cursor is about to grow into) is evicted and
    /// the count stays at capacity. Always succeeds.
    pub fn set(&mut self, key: K, value: V) -> bool {
        let now = Instant::now();

        let id = self.ring.insert_left(self.cursor, key, value, now);
        self.cursor = Some(id);
        self.latest = Some(id);
        self.diag("set", || format!("inserted at slot {}", id.0));

        if self.len + 1 > self.capacity {
            // Capacity >= 1 guarantees at least two ring members here, so
            // the victim is never the entry just inserted
            let victim = self.ring.left_of(id);
            debug_assert_ne!(victim, id);
            self.ring.unlink(victim);
            self.stats.record_eviction();
            self.diag("set", || {
                format!("oversized, evicted entry left of cursor (slot {})", victim.0)
            });
        } else {
            self.len += 1;
        }

        true
    }

    // == Validate ==
    /// The temporal sweep: walks the ring leftward starting just outside
    /// the cursor (from `cursor.left`) and ages out entries past the TTL.
    ///
    /// Per stale entry: if it holds the most recent touch in the whole
    /// cache, the entire cache is stale and resets wholesale; if it is the
    /// cursor, the cursor detaches but the entry stays linked; otherwise
    /// it is flagged stale. Stale entries are never unlinked here - they
    /// remain reachable by lookup until eviction or a full reset. Fresh
    /// entries re-anchor a missing cursor, or capture it when they are
    /// fresher than its current holder.
    ///
    /// Afterwards the live count is recomputed by traversal from the
    /// cursor; an empty result discards any unreachable remnant so the
    /// caller can stop the periodic scheduler.
    ///
    /// # Panics
    /// If the ring fails its integrity check. A non-circular ring is an
    /// unrecoverable invariant violation (see `error`), and sweeping it
    /// would silently produce wrong answers.
    pub fn validate(&mut self) {
        let now = Instant::now();

        if let Err(err) = self.ring.verify() {
            panic!("cache({}): {err}", self.name);
        }

        self.stats.record_sweep();
        self.diag("validate", || "starting".to_string());

        let Some(cursor) = self.cursor else {
            // len == 0 iff cursor is None; nothing to walk
            debug_assert_eq!(self.len, 0);
            return;
        };

        let walk: Vec<NodeId> = self
            .ring
            .iter_from(Direction::Left, self.ring.left_of(cursor))
            .collect();

        for id in walk {
            if self.ring.node(id).is_expired_at(now, self.ttl) {
                if self.latest == Some(id) {
                    self.diag("validate", || {
                        format!("resetting cache, latest entry expired (slot {})", id.0)
                    });
                    self.reset();
                    self.stats.record_full_reset();
                    return;
                }
                if self.cursor == Some(id) {
                    self.diag("validate", || {
                        format!("expired entry holds the cursor, detaching (slot {})", id.0)
                    });
                    self.cursor = None;
                } else {
                    self.diag("validate", || format!("expired entry at slot {}", id.0));
                }
                self.ring.node_mut(id).stale = true;
                self.stats.record_stale_mark();
            } else {
                let fresher = match self.cursor {
                    None => true,
                    Some(c) => self.ring.node(id).last_touched > self.ring.node(c).last_touched,
                };
                if fresher {
                    self.diag("validate", || format!("re-anchoring cursor at slot {}", id.0));
                    self.cursor = Some(id);
                }
            }
        }

        // Count all members reachable from the cursor, stale ones included
        self.len = match self.cursor {
            Some(c) => self.ring.iter_from(Direction::Left, c).count(),
            None => 0,
        };

        if self.len == 0 {
            // A detached cursor with no fresh survivor strands the rest of
            // the ring; discard it wholesale
            self.reset();
        }

        self.diag("validate", || format!("done, {} entries live", self.len));
    }

    // == Accessors ==
    /// Current live entry count.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Configured capacity bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Key of the entry the cursor currently anchors on, if any.
    pub fn cursor_key(&self) -> Option<&K> {
        self.cursor.map(|id| &self.ring.node(id).key)
    }

    /// Snapshot of the performance counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_live_entries(self.len);
        stats
    }

    // == Internal ==
    /// Returns the cache to its empty state in place.
    fn reset(&mut self) {
        self.ring.clear();
        self.cursor = None;
        self.latest = None;
        self.len = 0;
    }

    /// Emits a diagnostic message, formatting only when the sink listens.
    fn diag(&self, op: &str, message: impl FnOnce() -> String) {
        if self.sink.enabled() {
            let namespace = format!("cache({})::{op}", self.name);
            self.sink.emit(&namespace, &message());
        }
    }

    #[cfg(test)]
    pub(crate) fn ring(&self) -> &Ring<K, V> {
        &self.ring
    }

    #[cfg(test)]
    pub(crate) fn cursor(&self) -> Option<NodeId> {
        self.cursor
    }
}
