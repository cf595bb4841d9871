//! Cache Entry Module
//!
//! Defines one cached mapping living on the ring. Entries exist only
//! inside the ring arena; their neighbor links are stable handles, never
//! owning references, so the cycle needs no reference counting.

use std::time::Duration;

use tokio::time::Instant;

use super::ring::NodeId;

// == Entry ==
/// One cached key/value mapping plus its ring links and age metadata.
#[derive(Debug, Clone)]
pub struct Entry<K, V> {
    /// Opaque comparison key
    pub key: K,
    /// Opaque payload
    pub value: V,
    /// Counter-clockwise neighbor (self for a singleton ring)
    pub(crate) left: NodeId,
    /// Clockwise neighbor (self for a singleton ring)
    pub(crate) right: NodeId,
    /// Creation time or time of the last successful lookup match
    pub last_touched: Instant,
    /// Set by the sweep when the entry outlives the TTL. Informational
    /// only: no operation filters on it, and only a full reset removes
    /// stale entries from the ring.
    pub stale: bool,
}

impl<K, V> Entry<K, V> {
    /// Creates an entry with the given neighbors, touched at `now`.
    pub(crate) fn new(key: K, value: V, left: NodeId, right: NodeId, now: Instant) -> Self {
        Self {
            key,
            value,
            left,
            right,
            last_touched: now,
            stale: false,
        }
    }

    /// Whether the entry has outlived `ttl` as of `now`.
    ///
    /// Boundary condition: an entry is stale only once strictly more than
    /// the TTL has elapsed since its last touch; an entry exactly `ttl`
    /// old survives the sweep.
    pub fn is_expired_at(&self, now: Instant, ttl: Duration) -> bool {
        now.duration_since(self.last_touched) > ttl
    }
}
