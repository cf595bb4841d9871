//! Configuration Module
//!
//! Construction-time parameters for a cache instance. Every field has a
//! sensible default; the comparator and diagnostic sink are pluggable
//! strategies injected here rather than dispatched on the key type.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::diag::{DiagnosticSink, TracingSink};

// == Defaults ==
/// Default maximum number of live entries
pub const DEFAULT_CAPACITY: usize = 10;

/// Default entry time-to-live in milliseconds
pub const DEFAULT_TTL_MS: u64 = 10_000;

/// Default diagnostic label
pub const DEFAULT_NAME: &str = "cache";

// == Key Comparator ==
/// Key-equality predicate used by lookup.
///
/// Injected as a function value so callers can memoize on object identity,
/// case-insensitive strings, or anything else without a trait bound on the
/// key beyond what the default comparator needs.
pub type KeyComparator<K> = Arc<dyn Fn(&K, &K) -> bool + Send + Sync>;

// == Cache Config ==
/// Cache configuration parameters.
pub struct CacheConfig<K> {
    /// Diagnostic label only; never affects behavior
    pub name: String,
    /// Maximum number of live entries (values below 1 are treated as 1)
    pub capacity: usize,
    /// Duration after which an untouched entry is eligible for the sweep
    pub ttl: Duration,
    /// Key-equality predicate used by lookup
    pub comparator: KeyComparator<K>,
    /// Sink receiving diagnostic messages
    pub sink: Arc<dyn DiagnosticSink>,
}

impl<K> CacheConfig<K> {
    /// Creates a config with the given label and defaults everywhere else.
    pub fn new(name: impl Into<String>) -> Self
    where
        K: PartialEq,
    {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the capacity bound.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the entry time-to-live.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Replaces the key comparator.
    pub fn with_comparator(
        mut self,
        comparator: impl Fn(&K, &K) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.comparator = Arc::new(comparator);
        self
    }

    /// Replaces the diagnostic sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Interval between periodic sweep ticks: half the TTL, so an entry is
    /// examined at least once before it is twice its lifetime old.
    pub fn sweep_period(&self) -> Duration {
        self.ttl / 2
    }
}

impl<K: PartialEq> Default for CacheConfig<K> {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            capacity: DEFAULT_CAPACITY,
            ttl: Duration::from_millis(DEFAULT_TTL_MS),
            comparator: Arc::new(|a: &K, b: &K| a == b),
            sink: Arc::new(TracingSink),
        }
    }
}

// Manual Debug: the comparator and sink are opaque.
impl<K> fmt::Debug for CacheConfig<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfig")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
