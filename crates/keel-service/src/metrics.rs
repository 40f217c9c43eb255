//! Lightweight per-service counters.
//!
//! Counters are updated with relaxed atomics on the hot path and read
//! as a consistent-enough snapshot for diagnostics and tests.

use std::sync::atomic::{AtomicU64, Ordering};

/// Internal counter storage shared between the host and its handles.
#[derive(Debug, Default)]
pub(crate) struct MetricsInner {
    pub(crate) lists_submitted: AtomicU64,
    pub(crate) lists_executed: AtomicU64,
    pub(crate) lists_cancelled: AtomicU64,
    pub(crate) lists_dropped: AtomicU64,
    pub(crate) commands_executed: AtomicU64,
    pub(crate) commands_failed: AtomicU64,
    pub(crate) queue_full_rejections: AtomicU64,
    pub(crate) updates: AtomicU64,
}

impl MetricsInner {
    pub(crate) fn snapshot(&self) -> ServiceMetrics {
        ServiceMetrics {
            lists_submitted: self.lists_submitted.load(Ordering::Relaxed),
            lists_executed: self.lists_executed.load(Ordering::Relaxed),
            lists_cancelled: self.lists_cancelled.load(Ordering::Relaxed),
            lists_dropped: self.lists_dropped.load(Ordering::Relaxed),
            commands_executed: self.commands_executed.load(Ordering::Relaxed),
            commands_failed: self.commands_failed.load(Ordering::Relaxed),
            queue_full_rejections: self.queue_full_rejections.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn add(&self, counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }
}

/// A point-in-time snapshot of one service's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServiceMetrics {
    /// Command lists accepted into the queue.
    pub lists_submitted: u64,
    /// Command lists fully executed.
    pub lists_executed: u64,
    /// Command lists cancelled before execution.
    pub lists_cancelled: u64,
    /// Command lists dropped unexecuted at shutdown.
    pub lists_dropped: u64,
    /// Individual commands executed successfully.
    pub commands_executed: u64,
    /// Individual commands that returned an error.
    pub commands_failed: u64,
    /// Submissions rejected with back-pressure (`QueueFull`). Nothing
    /// was enqueued for these; the producer is expected to retry.
    pub queue_full_rejections: u64,
    /// Update passes completed.
    pub updates: u64,
}
