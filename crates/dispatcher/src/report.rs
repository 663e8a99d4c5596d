//! DispatchReport - run summary

use std::fmt;
use std::time::Duration;

use observability::LagSummary;

use crate::metrics::MetricsSnapshot;

/// Marker returned by a successful run
pub const COMPLETION_MESSAGE: &str = "Processing completed.";

/// Summary of a finished run
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Records read from the source
    pub total_records: usize,
    /// Delivery and pacing counters
    pub counts: MetricsSnapshot,
    /// Lag readings seen after each batch
    pub lag: LagSummary,
    /// Wall time of the dispatch loop
    pub elapsed: Duration,
}

impl DispatchReport {
    pub fn completion_message(&self) -> &'static str {
        COMPLETION_MESSAGE
    }

    pub fn total_paused(&self) -> Duration {
        Duration::from_millis(self.counts.paused_ms)
    }
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Dispatch Summary ===")?;
        writeln!(f, "Records: {}", self.total_records)?;
        writeln!(f, "Batches: {}", self.counts.batches)?;
        writeln!(
            f,
            "Deliveries: {} delivered, {} rejected, {} errored",
            self.counts.delivered, self.counts.rejected, self.counts.errored
        )?;
        writeln!(
            f,
            "Throttle pauses: {} ({:.1}s)",
            self.counts.throttle_pauses,
            self.total_paused().as_secs_f64()
        )?;
        writeln!(f, "{}", self.lag)?;
        write!(f, "Elapsed: {:.2}s", self.elapsed.as_secs_f64())
    }
}
