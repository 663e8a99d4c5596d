//! Layered error definitions
//!
//! Categorized by phase: config / source / general. Delivery, credential and
//! lag failures never become a `ContractError`; they are folded into values at
//! the collaborator boundary.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Input-phase Errors =====
    /// Record file could not be retrieved
    #[error("failed to fetch records from '{source_name}': {message}")]
    SourceFetch {
        source_name: String,
        message: String,
    },

    /// Record file was retrieved but could not be decoded
    #[error("failed to decode records from '{source_name}': {message}")]
    SourceDecode {
        source_name: String,
        message: String,
    },

    /// Trigger event could not be interpreted
    #[error("invalid trigger event: {message}")]
    TriggerEvent { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create source fetch error
    pub fn source_fetch(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceFetch {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create source decode error
    pub fn source_decode(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceDecode {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create trigger event error
    pub fn trigger_event(message: impl Into<String>) -> Self {
        Self::TriggerEvent {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = ContractError::source_fetch("s3://bucket/key.csv", "access denied");
        assert_eq!(
            err.to_string(),
            "failed to fetch records from 's3://bucket/key.csv': access denied"
        );

        let err = ContractError::config_validation("batch_size", "must be >= 1");
        assert!(err.to_string().contains("'batch_size'"));
    }
}
