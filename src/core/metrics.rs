//! Dispatcher metrics for observability
//!
//! Counts what happened to emit calls and how often sinks failed. Unlike
//! [`LogStats`](super::stats::LogStats) these are lifetime totals.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use factory_diagnostics::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
/// metrics.record_accepted();
/// metrics.record_rejected();
/// assert_eq!(metrics.accepted_count(), 1);
/// assert_eq!(metrics.rejected_count(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Entries that passed the level policy and were dispatched
    accepted: AtomicU64,

    /// Calls turned away by the level policy
    rejected: AtomicU64,

    /// Console sink errors or panics
    sink_failures: AtomicU64,

    /// Durable slot writes, loads or clears that failed
    persistence_failures: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            persistence_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn accepted_count(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected_count(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn persistence_failures(&self) -> u64 {
        self.persistence_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.accepted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_persistence_failure(&self) -> u64 {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatchMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            accepted: AtomicU64::new(self.accepted_count()),
            rejected: AtomicU64::new(self.rejected_count()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            persistence_failures: AtomicU64::new(self.persistence_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.accepted_count(), 0);
        assert_eq!(metrics.rejected_count(), 0);
        assert_eq!(metrics.sink_failures(), 0);
        assert_eq!(metrics.persistence_failures(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.record_persistence_failure(), 0);
        assert_eq!(metrics.record_persistence_failure(), 1);
        assert_eq!(metrics.persistence_failures(), 2);
    }

    #[test]
    fn test_clone_is_a_snapshot() {
        let metrics = DispatchMetrics::new();
        metrics.record_accepted();
        metrics.record_sink_failure();

        let snapshot = metrics.clone();
        metrics.record_accepted();

        assert_eq!(metrics.accepted_count(), 2);
        assert_eq!(snapshot.accepted_count(), 1);
        assert_eq!(snapshot.sink_failures(), 1);
    }
}
