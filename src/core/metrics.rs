//! Dispatcher metrics for observability
//!
//! Counters are updated by producers (enqueue side) and by the dispatcher
//! worker (delivery side) with relaxed atomics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing dispatcher activity
///
/// # Example
///
/// ```
/// use logr::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Records accepted into the queue
    enqueued: AtomicU64,

    /// Records (including self-reported failures) fully processed by the worker
    delivered: AtomicU64,

    /// Successful sink writes
    writes: AtomicU64,

    /// Sink writes or formatter calls that failed
    write_failures: AtomicU64,

    /// Barriers acknowledged by the worker
    barriers: AtomicU64,

    /// Queue replacements performed by capacity changes
    queue_swaps: AtomicU64,

    /// Currently registered sinks
    sinks: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            barriers: AtomicU64::new(0),
            queue_swaps: AtomicU64::new(0),
            sinks: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn barriers(&self) -> u64 {
        self.barriers.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_swaps(&self) -> u64 {
        self.queue_swaps.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sinks(&self) -> u64 {
        self.sinks.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write(&self) -> u64 {
        self.writes.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_barrier(&self) -> u64 {
        self.barriers.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_swap(&self) -> u64 {
        self.queue_swaps.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn set_sinks(&self, count: usize) {
        self.sinks.store(count as u64, Ordering::Relaxed);
    }

    /// Failed writes as a percentage of all write attempts (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.writes() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatchMetrics {
    /// Create a snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            delivered: AtomicU64::new(self.delivered()),
            writes: AtomicU64::new(self.writes()),
            write_failures: AtomicU64::new(self.write_failures()),
            barriers: AtomicU64::new(self.barriers()),
            queue_swaps: AtomicU64::new(self.queue_swaps()),
            sinks: AtomicU64::new(self.sinks()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.enqueued(), 0);
        assert_eq!(metrics.delivered(), 0);
        assert_eq!(metrics.writes(), 0);
        assert_eq!(metrics.write_failures(), 0);
        assert_eq!(metrics.sinks(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.record_enqueued(), 0);
        assert_eq!(metrics.record_enqueued(), 1);
        assert_eq!(metrics.enqueued(), 2);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = DispatchMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..3 {
            metrics.record_write();
        }
        metrics.record_write_failure();
        assert_eq!(metrics.failure_rate(), 25.0);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let metrics = DispatchMetrics::new();
        metrics.record_delivered();
        metrics.set_sinks(3);

        let snapshot = metrics.clone();
        metrics.record_delivered();

        assert_eq!(snapshot.delivered(), 1);
        assert_eq!(snapshot.sinks(), 3);
        assert_eq!(metrics.delivered(), 2);
    }
}
