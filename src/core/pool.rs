//! Reuse pool for records
//!
//! An unbounded, lock-free free list. Producers acquire from it on every
//! emission and the dispatcher releases into it after delivery, so the hot
//! path allocates only while the pool is warming up.

use super::record::Record;
use crossbeam_queue::SegQueue;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe pool of zeroed [`Record`]s
#[derive(Debug, Default)]
pub struct RecordPool {
    idle: SegQueue<Box<Record>>,
    allocations: AtomicU64,
    reuses: AtomicU64,
}

impl RecordPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-fill the pool with `count` zeroed records
    pub fn with_preallocated(count: usize) -> Self {
        let pool = Self::new();
        for _ in 0..count {
            pool.idle.push(Box::default());
        }
        pool
    }

    /// Take a recycled record, or allocate a fresh one
    pub fn acquire(&self) -> Box<Record> {
        match self.idle.pop() {
            Some(record) => {
                self.reuses.fetch_add(1, Ordering::Relaxed);
                record
            }
            None => {
                self.allocations.fetch_add(1, Ordering::Relaxed);
                Box::default()
            }
        }
    }

    /// Reset `record` and make it available again
    pub fn release(&self, mut record: Box<Record>) {
        record.reset();
        debug_assert!(record.is_zeroed());
        self.idle.push(record);
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            idle: self.idle.len(),
            allocations: self.allocations.load(Ordering::Relaxed),
            reuses: self.reuses.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of pool activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub idle: usize,
    pub allocations: u64,
    pub reuses: u64,
}

impl PoolStats {
    /// Fraction of acquisitions served from the free list (0.0 - 1.0)
    pub fn reuse_ratio(&self) -> f64 {
        let total = self.allocations + self.reuses;
        if total == 0 {
            0.0
        } else {
            self.reuses as f64 / total as f64
        }
    }
}
