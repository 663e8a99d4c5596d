//! Per-record delivery outcome and lag readings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of one delivery attempt
///
/// Used for observability only; the dispatcher never branches on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// Endpoint answered 200
    Delivered,

    /// Endpoint answered with any other status
    Rejected { status: u16 },

    /// Transport-level fault (timeout, DNS, connection reset, ...)
    Errored { cause: String },
}

impl DeliveryOutcome {
    /// Create an errored outcome
    pub fn errored(cause: impl Into<String>) -> Self {
        Self::Errored {
            cause: cause.into(),
        }
    }

    /// Whether the record was accepted by the endpoint
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    /// Short label used in logs and metric labels
    pub fn label(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Rejected { .. } => "rejected",
            Self::Errored { .. } => "errored",
        }
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delivered => write!(f, "delivered"),
            Self::Rejected { status } => write!(f, "rejected (status {status})"),
            Self::Errored { cause } => write!(f, "errored: {cause}"),
        }
    }
}

/// Maximum observed consumer lag over the trailing window
///
/// Never negative. Unavailable readings are represented as zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct LagReading(f64);

impl LagReading {
    /// Reading used when the metric source has nothing to say
    pub const ZERO: Self = Self(0.0);

    /// Create a reading, clamping negative and NaN inputs to zero
    pub fn new(value: f64) -> Self {
        if value.is_nan() || value < 0.0 {
            Self::ZERO
        } else {
            Self(value)
        }
    }

    /// Raw value
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether this reading is strictly above `threshold`
    pub fn exceeds(self, threshold: f64) -> bool {
        self.0 > threshold
    }
}

impl From<f64> for LagReading {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for LagReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lag_reading_clamps_invalid_values() {
        assert_eq!(LagReading::new(-3.0), LagReading::ZERO);
        assert_eq!(LagReading::new(f64::NAN), LagReading::ZERO);
        assert_eq!(LagReading::new(12.5).value(), 12.5);
    }

    #[test]
    fn test_lag_reading_threshold_is_strict() {
        assert!(!LagReading::new(1000.0).exceeds(1000.0));
        assert!(LagReading::new(1000.5).exceeds(1000.0));
        assert!(!LagReading::ZERO.exceeds(0.0));
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(DeliveryOutcome::Delivered.label(), "delivered");
        assert_eq!(DeliveryOutcome::Rejected { status: 403 }.label(), "rejected");
        assert_eq!(DeliveryOutcome::errored("reset").label(), "errored");
        assert!(DeliveryOutcome::Delivered.is_delivered());
        assert!(!DeliveryOutcome::Rejected { status: 500 }.is_delivered());
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_string(&DeliveryOutcome::Rejected { status: 401 }).unwrap();
        assert_eq!(json, r#"{"outcome":"rejected","status":401}"#);
    }
}
