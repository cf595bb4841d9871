//! Cache Module
//!
//! The ring-based cache core: entry type, the arena-backed circular ring,
//! the cursor-driven store, and its performance counters.

mod entry;
mod ring;
mod stats;
mod store;


// Re-export public types
pub use entry::Entry;
pub use ring::{DirectedIter, Direction, NodeId, OutwardIter, Ring};
pub use stats::CacheStats;
pub use store::CacheStore;
