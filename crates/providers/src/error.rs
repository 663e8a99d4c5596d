//! Provider error types

use thiserror::Error;

/// Collaborator failures
///
/// These never escape the contract traits: credentials collapse to an empty
/// string and lag readings to zero.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Secret store call failed
    #[error("failed to fetch secret '{secret_name}': {message}")]
    SecretFetch {
        secret_name: String,
        message: String,
    },

    /// Secret exists but carries no string value
    #[error("secret '{secret_name}' has no string value")]
    SecretMissing { secret_name: String },

    /// Metric store call failed
    #[error("failed to query metric '{metric}': {message}")]
    MetricQuery { metric: String, message: String },

    /// Provider misconfiguration
    #[error("provider config error: {message}")]
    Config { message: String },
}

impl ProviderError {
    pub fn secret_fetch(secret_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SecretFetch {
            secret_name: secret_name.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn metric_query(metric: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MetricQuery {
            metric: metric.into(),
            message: message.into(),
        }
    }
}

/// Provider Result 类型别名
pub type Result<T> = std::result::Result<T, ProviderError>;
