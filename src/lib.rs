//! Ring Cache - a fixed-capacity, self-expiring memoization cache
//!
//! Entries live on a circular doubly-linked ring with a single movable
//! cursor marking the most recently touched entry. Inserts splice in next
//! to the cursor and evict cursor-relative under capacity pressure; a
//! periodic background sweep ages out entries past their TTL.

pub mod cache;
pub mod config;
pub mod diag;
pub mod error;
pub mod handle;
pub mod tasks;

pub use cache::{CacheStats, CacheStore};
pub use config::{CacheConfig, KeyComparator};
pub use diag::{DiagnosticSink, NoopSink, TracingSink};
pub use error::CacheError;
pub use handle::RingCache;
pub use tasks::spawn_sweep_task;
