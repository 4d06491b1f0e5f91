//! Counters describing the work done by a scoring run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// Trait for tracking scoring work.
///
/// Implementations receive one call per candidate pair scored, per top-k
/// insertion attempt and per matrix multiplication. This is useful for
/// sizing runs: dense products dominate the cost of Katz and commute time.
pub trait ScoringMetrics: Send + Sync {
    /// Records a candidate pair whose score was computed.
    fn pair_scored(&self);

    /// Records a top-k insertion attempt.
    ///
    /// # Parameters
    /// * `accepted` - Whether the link displaced the weakest resident.
    fn heap_insert(&self, accepted: bool);

    /// Records one dense matrix product.
    fn matrix_multiply(&self);
}

/// A no-op implementation of [`ScoringMetrics`] that discards everything.
#[derive(Default)]
pub struct NoopMetrics;

impl ScoringMetrics for NoopMetrics {
    fn pair_scored(&self) {}
    fn heap_insert(&self, _accepted: bool) {}
    fn matrix_multiply(&self) {}
}

/// Atomic counter implementation of [`ScoringMetrics`].
#[derive(Default)]
pub struct CounterMetrics {
    /// Candidate pairs scored.
    pub pairs_scored: AtomicU64,

    /// Insertions that entered the top-k.
    pub heap_accepted: AtomicU64,

    /// Insertions that did not beat the weakest resident.
    pub heap_rejected: AtomicU64,

    /// Dense matrix products computed.
    pub matrix_multiplies: AtomicU64,
}

impl ScoringMetrics for CounterMetrics {
    fn pair_scored(&self) {
        self.pairs_scored.fetch_add(1, Ordering::Relaxed);
    }

    fn heap_insert(&self, accepted: bool) {
        if accepted {
            self.heap_accepted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.heap_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn matrix_multiply(&self) {
        self.matrix_multiplies.fetch_add(1, Ordering::Relaxed);
    }
}

impl CounterMetrics {
    /// Copies the current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            pairs_scored: self.pairs_scored.load(Ordering::Relaxed),
            heap_accepted: self.heap_accepted.load(Ordering::Relaxed),
            heap_rejected: self.heap_rejected.load(Ordering::Relaxed),
            matrix_multiplies: self.matrix_multiplies.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CounterMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Candidate pairs scored.
    pub pairs_scored: u64,
    /// Insertions that entered the top-k.
    pub heap_accepted: u64,
    /// Insertions rejected by the top-k.
    pub heap_rejected: u64,
    /// Dense matrix products computed.
    pub matrix_multiplies: u64,
}

/// Returns [`NoopMetrics`] wrapped in an [`Arc`].
pub fn default_metrics() -> Arc<dyn ScoringMetrics> {
    Arc::new(NoopMetrics)
}
