//! Lag monitors
//!
//! Contains CloudWatchLagMonitor and FixedLagMonitor.

mod cloudwatch;
mod fixed;

pub use self::cloudwatch::{max_datapoint, CloudWatchLagMonitor};
pub use self::fixed::FixedLagMonitor;

use contracts::LagReading;
use tracing::warn;

use crate::error::Result;

/// Fallible lag lookup
#[trait_variant::make(LagSource: Send)]
pub trait LocalLagSource {
    /// Source description (used for logging)
    fn describe(&self) -> String;

    /// Query the current lag
    async fn try_current_lag(&self) -> Result<LagReading>;
}

/// Fail-open policy: a failed query reads as zero lag
pub fn collapse_lag(result: Result<LagReading>, source: &str) -> LagReading {
    match result {
        Ok(reading) => reading,
        Err(e) => {
            warn!(source = %source, error = %e, "Lag unavailable, assuming zero");
            LagReading::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    #[test]
    fn test_collapse_lag() {
        assert_eq!(collapse_lag(Ok(LagReading::new(42.0)), "test").value(), 42.0);
        let failed = Err(ProviderError::metric_query("IteratorAge", "throttled"));
        assert_eq!(collapse_lag(failed, "test"), LagReading::ZERO);
    }
}
