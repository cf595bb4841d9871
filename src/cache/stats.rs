//! Cache Statistics Module
//!
//! Per-instance performance counters: hits, misses, evictions, and the
//! sweep's decisions. Read-side only; nothing in the cache acts on these.

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of successful lookups
    pub hits: u64,
    /// Number of failed lookups
    pub misses: u64,
    /// Number of entries evicted under capacity pressure
    pub evictions: u64,
    /// Number of entries the sweep flagged as stale
    pub stale_marks: u64,
    /// Number of whole-cache resets triggered by a stale latest entry
    pub full_resets: u64,
    /// Number of sweep passes run
    pub sweeps: u64,
    /// Live entry count at snapshot time
    pub live_entries: usize,
}

impl CacheStats {
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have happened.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_stale_mark(&mut self) {
        self.stale_marks += 1;
    }

    pub fn record_full_reset(&mut self) {
        self.full_resets += 1;
    }

    pub fn record_sweep(&mut self) {
        self.sweeps += 1;
    }

    /// Updates the live entry count for a snapshot.
    pub fn set_live_entries(&mut self, count: usize) {
        self.live_entries = count;
    }
}
