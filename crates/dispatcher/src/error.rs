//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
///
/// Delivery failures never show up here; they are folded into
/// `DeliveryOutcome` and the run continues.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Record source retrieval or decoding failed before the first batch
    #[error("record source failed: {0}")]
    Source(#[from] contracts::ContractError),

    /// HTTP client could not be constructed
    #[error("failed to build delivery client: {message}")]
    ClientBuild { message: String },

    /// Delivery endpoint is not a usable base URL
    #[error("invalid delivery endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },
}

impl DispatcherError {
    /// Create a client build error
    pub fn client_build(message: impl Into<String>) -> Self {
        Self::ClientBuild {
            message: message.into(),
        }
    }

    pub fn invalid_endpoint(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}
