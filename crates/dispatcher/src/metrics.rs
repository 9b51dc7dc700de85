//! Destination metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Delivery metrics for a single registered destination
#[derive(Debug, Default)]
pub struct DestinationMetrics {
    /// Total successful sends
    sent_count: AtomicU64,
    /// Total send failures reported by the destination
    failure_count: AtomicU64,
    /// Total calls rejected by the level filter
    filtered_count: AtomicU64,
    /// Total sends dropped because the queue rejected them
    dropped_count: AtomicU64,
    /// Total completed flushes
    flush_count: AtomicU64,
}

impl DestinationMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total sent count
    pub fn sent_count(&self) -> u64 {
        self.sent_count.load(Ordering::Relaxed)
    }

    /// Increment sent count
    pub fn inc_sent_count(&self) {
        self.sent_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get failure count
    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    /// Increment failure count
    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get filtered count
    pub fn filtered_count(&self) -> u64 {
        self.filtered_count.load(Ordering::Relaxed)
    }

    /// Increment filtered count
    pub fn inc_filtered_count(&self) {
        self.filtered_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get dropped count
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    /// Increment dropped count
    pub fn inc_dropped_count(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get flush count
    pub fn flush_count(&self) -> u64 {
        self.flush_count.load(Ordering::Relaxed)
    }

    /// Increment flush count
    pub fn inc_flush_count(&self) {
        self.flush_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sent_count: self.sent_count(),
            failure_count: self.failure_count(),
            filtered_count: self.filtered_count(),
            dropped_count: self.dropped_count(),
            flush_count: self.flush_count(),
        }
    }
}

/// Snapshot of destination metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub sent_count: u64,
    pub failure_count: u64,
    pub filtered_count: u64,
    pub dropped_count: u64,
    pub flush_count: u64,
}
