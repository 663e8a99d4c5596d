//! FixedLagMonitor - constant lag reading

use contracts::{LagMonitor, LagReading};

use super::LagSource;
use crate::error::Result;

/// Always reports the same lag (local runs without a metric store)
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLagMonitor {
    reading: LagReading,
}

impl FixedLagMonitor {
    pub fn new(value: f64) -> Self {
        Self {
            reading: LagReading::new(value),
        }
    }
}

impl LagSource for FixedLagMonitor {
    fn describe(&self) -> String {
        format!("fixed({})", self.reading)
    }

    async fn try_current_lag(&self) -> Result<LagReading> {
        Ok(self.reading)
    }
}

impl LagMonitor for FixedLagMonitor {
    async fn current_lag(&self) -> LagReading {
        self.reading
    }
}
