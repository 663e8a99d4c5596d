//! Per-run dispatch metrics

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::DeliveryOutcome;

/// Counters for one dispatcher run
///
/// Shared through an `Arc` so a caller can read progress while a run is in
/// flight.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    delivered: AtomicU64,
    rejected: AtomicU64,
    errored: AtomicU64,
    batches: AtomicU64,
    lag_queries: AtomicU64,
    throttle_pauses: AtomicU64,
    paused_ms: AtomicU64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one delivery attempt by outcome
    pub fn record_outcome(&self, outcome: &DeliveryOutcome) {
        let counter = match outcome {
            DeliveryOutcome::Delivered => &self.delivered,
            DeliveryOutcome::Rejected { .. } => &self.rejected,
            DeliveryOutcome::Errored { .. } => &self.errored,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_batches(&self) {
        self.batches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_lag_queries(&self) {
        self.lag_queries.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one pacing pause of `paused_ms` milliseconds
    pub fn record_pause(&self, paused_ms: u64) {
        self.throttle_pauses.fetch_add(1, Ordering::Relaxed);
        self.paused_ms.fetch_add(paused_ms, Ordering::Relaxed);
    }

    pub fn attempts(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
            + self.rejected.load(Ordering::Relaxed)
            + self.errored.load(Ordering::Relaxed)
    }

    /// Zero every counter
    pub fn reset(&self) {
        for counter in [
            &self.delivered,
            &self.rejected,
            &self.errored,
            &self.batches,
            &self.lag_queries,
            &self.throttle_pauses,
            &self.paused_ms,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attempts: self.attempts(),
            delivered: self.delivered.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            errored: self.errored.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            lag_queries: self.lag_queries.load(Ordering::Relaxed),
            throttle_pauses: self.throttle_pauses.load(Ordering::Relaxed),
            paused_ms: self.paused_ms.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub attempts: u64,
    pub delivered: u64,
    pub rejected: u64,
    pub errored: u64,
    pub batches: u64,
    pub lag_queries: u64,
    pub throttle_pauses: u64,
    pub paused_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes_are_counted_separately() {
        let metrics = DispatchMetrics::new();
        metrics.record_outcome(&DeliveryOutcome::Delivered);
        metrics.record_outcome(&DeliveryOutcome::Rejected { status: 500 });
        metrics.record_outcome(&DeliveryOutcome::errored("connection reset"));
        metrics.record_outcome(&DeliveryOutcome::Delivered);
        metrics.record_pause(5000);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.attempts, 4);
        assert_eq!(snapshot.delivered, 2);
        assert_eq!(snapshot.rejected, 1);
        assert_eq!(snapshot.errored, 1);
        assert_eq!(snapshot.throttle_pauses, 1);
        assert_eq!(snapshot.paused_ms, 5000);

        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
