//! Ring Module
//!
//! The circular doubly-linked structure underneath the cache, backed by an
//! arena so the cycle is expressed with stable indices instead of owning
//! references. Structural operations only: splicing a node in next to an
//! anchor, unlinking a node, lazy traversal, and integrity verification.
//! The caller (the store) owns the cursor and the live-entry count.

use tokio::time::Instant;

use super::entry::Entry;
use crate::error::{CacheError, Result};

// == Node Handle ==
/// Stable handle addressing one arena slot.
///
/// Handles are plain indices: a slot freed by [`Ring::unlink`] may be
/// reused by a later insert, so holders must not retain handles across
/// unlinks. Within the cache this holds because the cursor is re-pointed
/// on every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

// == Traversal Direction ==
/// Which neighbor link a directed traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Counter-clockwise
    Left,
    /// Clockwise
    Right,
}

impl Direction {
    fn step<K, V>(self, ring: &Ring<K, V>, id: NodeId) -> NodeId {
        match self {
            Direction::Left => ring.node(id).left,
            Direction::Right => ring.node(id).right,
        }
    }
}

// == Ring ==
/// Arena-backed circular doubly-linked ring of entries.
#[derive(Debug)]
pub struct Ring<K, V> {
    /// Arena slots; `None` marks a freed slot awaiting reuse
    slots: Vec<Option<Entry<K, V>>>,
    /// Free slot indices, reused before the arena grows
    free: Vec<usize>,
}

impl<K, V> Ring<K, V> {
    // == Constructor ==
    /// Creates an empty ring.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    // == Insert ==
    /// Allocates an entry and splices it immediately counter-clockwise of
    /// `anchor`, so the new entry's `right` is the anchor and its `left`
    /// is the anchor's old `left`. With no anchor the entry becomes a
    /// self-looped singleton ring.
    ///
    /// Returns the new entry's handle; the caller re-points the cursor.
    pub fn insert_left(&mut self, anchor: Option<NodeId>, key: K, value: V, now: Instant) -> NodeId {
        let id = self.reserve();
        match anchor {
            Some(anchor) => {
                let old_left = self.node(anchor).left;
                self.slots[id.0] = Some(Entry::new(key, value, old_left, anchor, now));
                self.node_mut(old_left).right = id;
                self.node_mut(anchor).left = id;
            }
            None => {
                self.slots[id.0] = Some(Entry::new(key, value, id, id, now));
            }
        }
        id
    }

    // == Unlink ==
    /// Removes an entry by joining its neighbors directly; unlinking a
    /// singleton leaves the ring empty. The slot is freed for reuse. Does
    /// not touch any counter; the caller maintains the live count.
    pub fn unlink(&mut self, id: NodeId) {
        let (left, right) = {
            let entry = self.node(id);
            (entry.left, entry.right)
        };
        if left != id {
            self.node_mut(left).right = right;
            self.node_mut(right).left = left;
        }
        self.slots[id.0] = None;
        self.free.push(id.0);
    }

    // == Traversal ==
    /// Lazy single-direction traversal starting at `start`.
    ///
    /// Yields `start` first, then follows the direction one step at a
    /// time; ends before revisiting `start` or re-yielding the node it
    /// just produced (the second guard covers two-entry rings, where both
    /// neighbors are the same node).
    pub fn iter_from(&self, dir: Direction, start: NodeId) -> DirectedIter<'_, K, V> {
        DirectedIter {
            ring: self,
            dir,
            start,
            cursor: start,
            prev: None,
            started: false,
        }
    }

    /// Lazy dual-direction traversal: `start`, then its left neighbor,
    /// then its right neighbor, alternating outward with one independent
    /// pointer per direction. Stops as soon as either direction's next
    /// step lands on `start` or on the node yielded immediately before.
    ///
    /// This is the substrate for nearest-neighbor lookup: entries are
    /// visited in order of ring distance from the start.
    pub fn iter_outward(&self, start: NodeId) -> OutwardIter<'_, K, V> {
        OutwardIter {
            ring: self,
            start,
            pointers: [start, start],
            steps: 0,
            prev: None,
            started: false,
            done: false,
        }
    }

    // == Accessors ==
    /// Borrows the entry behind a handle.
    ///
    /// Panics on a vacant slot: a live handle pointing at freed storage is
    /// the same class of unrecoverable corruption as a broken link.
    pub fn node(&self, id: NodeId) -> &Entry<K, V> {
        self.slots[id.0]
            .as_ref()
            .expect("ring handle points at a vacant slot")
    }

    /// Mutably borrows the entry behind a handle.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Entry<K, V> {
        self.slots[id.0]
            .as_mut()
            .expect("ring handle points at a vacant slot")
    }

    /// Counter-clockwise neighbor of `id`.
    pub fn left_of(&self, id: NodeId) -> NodeId {
        self.node(id).left
    }

    /// Clockwise neighbor of `id`.
    pub fn right_of(&self, id: NodeId) -> NodeId {
        self.node(id).right
    }

    /// Number of live arena slots.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Whether the ring holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards every entry at once (full reset).
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    // == Integrity ==
    /// Verifies ring well-formedness: every live entry's neighbors are
    /// live, its left neighbor's `right` points back at it, and its right
    /// neighbor's `left` points back at it.
    pub fn verify(&self) -> Result<()> {
        for (ix, slot) in self.slots.iter().enumerate() {
            let Some(entry) = slot else { continue };
            let id = NodeId(ix);

            let left_back = self.get(entry.left).map(|n| n.right);
            if left_back != Some(id) {
                return Err(CacheError::RingCorrupted {
                    node: ix,
                    detail: format!(
                        "left neighbor {} does not point back (found {:?})",
                        entry.left.0, left_back
                    ),
                });
            }

            let right_back = self.get(entry.right).map(|n| n.left);
            if right_back != Some(id) {
                return Err(CacheError::RingCorrupted {
                    node: ix,
                    detail: format!(
                        "right neighbor {} does not point back (found {:?})",
                        entry.right.0, right_back
                    ),
                });
            }
        }
        Ok(())
    }

    // == Internal ==
    /// Non-panicking slot access, used by the integrity check.
    fn get(&self, id: NodeId) -> Option<&Entry<K, V>> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Reserves a slot index, reusing freed slots before growing.
    fn reserve(&mut self) -> NodeId {
        match self.free.pop() {
            Some(ix) => NodeId(ix),
            None => {
                self.slots.push(None);
                NodeId(self.slots.len() - 1)
            }
        }
    }
}

impl<K, V> Default for Ring<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// == Directed Iterator ==
/// See [`Ring::iter_from`].
pub struct DirectedIter<'a, K, V> {
    ring: &'a Ring<K, V>,
    dir: Direction,
    start: NodeId,
    cursor: NodeId,
    prev: Option<NodeId>,
    started: bool,
}

impl<K, V> Iterator for DirectedIter<'_, K, V> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.started {
            self.started = true;
            self.cursor = self.dir.step(self.ring, self.start);
            return Some(self.start);
        }

        let candidate = self.cursor;
        if candidate == self.start || Some(candidate) == self.prev {
            return None;
        }

        self.prev = Some(candidate);
        self.cursor = self.dir.step(self.ring, candidate);
        Some(candidate)
    }
}

// == Outward Iterator ==
/// See [`Ring::iter_outward`].
pub struct OutwardIter<'a, K, V> {
    ring: &'a Ring<K, V>,
    start: NodeId,
    /// One traversal pointer per direction: `[left, right]`
    pointers: [NodeId; 2],
    /// Steps taken after the start; parity selects the direction
    steps: usize,
    prev: Option<NodeId>,
    started: bool,
    done: bool,
}

impl<K, V> Iterator for OutwardIter<'_, K, V> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            let start = self.ring.node(self.start);
            self.pointers = [start.left, start.right];
            return Some(self.start);
        }

        let dir_ix = self.steps % 2;
        let candidate = self.pointers[dir_ix];
        if candidate == self.start || Some(candidate) == self.prev {
            self.done = true;
            return None;
        }

        self.pointers[dir_ix] = match dir_ix {
            0 => self.ring.node(candidate).left,
            _ => self.ring.node(candidate).right,
        };
        self.prev = Some(candidate);
        self.steps += 1;
        Some(candidate)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a ring of `n` entries keyed 0..n, inserting each to the left
    /// of the previous one (the same pattern the store uses). Returns the
    /// ring and the handles in insertion order.
    fn build(n: usize) -> (Ring<usize, ()>, Vec<NodeId>) {
        let now = Instant::now();
        let mut ring = Ring::new();
        let mut ids = Vec::new();
        let mut anchor = None;
        for key in 0..n {
            let id = ring.insert_left(anchor, key, (), now);
            ids.push(id);
            anchor = Some(id);
        }
        (ring, ids)
    }

    fn keys(ring: &Ring<usize, ()>, ids: impl Iterator<Item = NodeId>) -> Vec<usize> {
        ids.map(|id| ring.node(id).key).collect()
    }

    #[test]
    fn test_singleton_links_to_itself() {
        let (ring, ids) = build(1);
        assert_eq!(ring.len(), 1);
        assert_eq!(ring.left_of(ids[0]), ids[0]);
        assert_eq!(ring.right_of(ids[0]), ids[0]);
        ring.verify().unwrap();
    }

    #[test]
    fn test_insert_left_splices_between_anchor_and_its_left() {
        let (ring, ids) = build(3);
        // Inserting 2 left of 1 (whose left was 0) gives: 2.right == 1,
        // 2.left == 0, and the old neighbors re-pointed
        assert_eq!(ring.right_of(ids[2]), ids[1]);
        assert_eq!(ring.left_of(ids[2]), ids[0]);
        assert_eq!(ring.left_of(ids[1]), ids[2]);
        assert_eq!(ring.right_of(ids[0]), ids[2]);
        ring.verify().unwrap();
    }

    #[test]
    fn test_unlink_joins_neighbors() {
        let (mut ring, ids) = build(3);
        ring.unlink(ids[2]);
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.left_of(ids[1]), ids[0]);
        assert_eq!(ring.right_of(ids[0]), ids[1]);
        ring.verify().unwrap();
    }

    #[test]
    fn test_unlink_singleton_empties_ring() {
        let (mut ring, ids) = build(1);
        ring.unlink(ids[0]);
        assert!(ring.is_empty());
        ring.verify().unwrap();
    }

    #[test]
    fn test_freed_slot_is_reused() {
        let (mut ring, ids) = build(2);
        ring.unlink(ids[0]);
        let id = ring.insert_left(Some(ids[1]), 9, (), Instant::now());
        assert_eq!(id, ids[0]);
        assert_eq!(ring.len(), 2);
        ring.verify().unwrap();
    }

    #[test]
    fn test_directed_traversal_visits_all_once() {
        for n in 1..=5 {
            let (ring, ids) = build(n);
            let seen: Vec<NodeId> = ring.iter_from(Direction::Left, ids[n - 1]).collect();
            assert_eq!(seen.len(), n, "ring of {n}");
            let mut sorted = seen.clone();
            sorted.sort_by_key(|id| id.0);
            sorted.dedup();
            assert_eq!(sorted.len(), n, "ring of {n} yielded duplicates");
            assert_eq!(seen[0], ids[n - 1]);
        }
    }

    #[test]
    fn test_directed_traversal_order() {
        let (ring, ids) = build(3);
        // Leftward from the newest: 2, then 2.left == 0, then 0.left == 1
        let seen = keys(&ring, ring.iter_from(Direction::Left, ids[2]));
        assert_eq!(seen, vec![2, 0, 1]);

        let seen = keys(&ring, ring.iter_from(Direction::Right, ids[2]));
        assert_eq!(seen, vec![2, 1, 0]);
    }

    #[test]
    fn test_directed_traversal_is_restartable() {
        let (ring, ids) = build(4);
        let first: Vec<_> = ring.iter_from(Direction::Left, ids[3]).collect();
        let second: Vec<_> = ring.iter_from(Direction::Left, ids[3]).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_outward_traversal_singleton() {
        let (ring, ids) = build(1);
        let seen: Vec<_> = ring.iter_outward(ids[0]).collect();
        assert_eq!(seen, vec![ids[0]]);
    }

    #[test]
    fn test_outward_traversal_pair_stops_on_prev_guard() {
        // Both neighbors of each node are the same node; without the
        // previous-node guard the second direction would re-yield it
        let (ring, ids) = build(2);
        let seen: Vec<_> = ring.iter_outward(ids[1]).collect();
        assert_eq!(seen, vec![ids[1], ids[0]]);
    }

    #[test]
    fn test_outward_traversal_alternates_left_then_right() {
        let (ring, ids) = build(3);
        // Start at 2: left neighbor is 0, right neighbor is 1
        let seen = keys(&ring, ring.iter_outward(ids[2]));
        assert_eq!(seen, vec![2, 0, 1]);
    }

    #[test]
    fn test_outward_traversal_visits_all_once() {
        for n in 1..=6 {
            let (ring, ids) = build(n);
            let seen: Vec<NodeId> = ring.iter_outward(ids[n - 1]).collect();
            assert_eq!(seen.len(), n, "ring of {n}");
            let mut sorted = seen.clone();
            sorted.sort_by_key(|id| id.0);
            sorted.dedup();
            assert_eq!(sorted.len(), n, "ring of {n} yielded duplicates");
        }
    }

    #[test]
    fn test_verify_detects_broken_link() {
        let (mut ring, ids) = build(3);
        ring.node_mut(ids[0]).left = ids[0];
        let err = ring.verify().unwrap_err();
        assert!(matches!(err, CacheError::RingCorrupted { .. }));
    }

    #[test]
    fn test_verify_detects_dangling_neighbor() {
        let (mut ring, ids) = build(2);
        ring.node_mut(ids[1]).right = NodeId(99);
        assert!(ring.verify().is_err());
    }

    #[test]
    fn test_clear_discards_everything() {
        let (mut ring, _) = build(4);
        ring.clear();
        assert!(ring.is_empty());
        ring.verify().unwrap();
    }
}
