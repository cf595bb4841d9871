//! Error types for the ring cache
//!
//! Provides unified error handling using thiserror.
//!
//! Misses are ordinary return values, not errors. The only condition
//! modelled here is structural corruption of the ring, which is
//! unrecoverable: the ring is the cache's sole source of truth, so an
//! inconsistent neighbor link means every answer after it is suspect.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the ring cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Ring neighbor links are inconsistent (internal invariant violation)
    #[error("ring corrupted at node {node}: {detail}")]
    RingCorrupted {
        /// Arena index of the offending node
        node: usize,
        /// What the integrity check found
        detail: String,
    },
}

// == Result Type Alias ==
/// Convenience Result type for the ring cache.
pub type Result<T> = std::result::Result<T, CacheError>;
