//! Diagnostics Module
//!
//! The cache reports what it does (inserts, hits, misses, sweep decisions)
//! through an injected sink. The sink is purely observational: a disabled
//! sink turns every diagnostic call into a no-op with zero effect on cache
//! state, and callers are expected to check [`DiagnosticSink::enabled`]
//! before formatting anything expensive.

use tracing::debug;

// == Diagnostic Sink Trait ==
/// Destination for free-form tagged diagnostic messages.
///
/// Messages carry a namespace label (e.g. `cache(shadow)::set`) and a
/// preformatted body. Implementations must be cheap to call when disabled.
pub trait DiagnosticSink: Send + Sync {
    /// Whether messages will be observed at all.
    ///
    /// Callers skip message formatting entirely when this returns false.
    fn enabled(&self) -> bool {
        true
    }

    /// Emits one diagnostic message under the given namespace.
    fn emit(&self, namespace: &str, message: &str);
}

// == Tracing Sink ==
/// Default sink forwarding diagnostics to the `tracing` facade at DEBUG.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, namespace: &str, message: &str) {
        debug!(namespace, "{message}");
    }
}

// == Noop Sink ==
/// Disabled sink; every diagnostic call becomes a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn enabled(&self) -> bool {
        false
    }

    fn emit(&self, _namespace: &str, _message: &str) {}
}
