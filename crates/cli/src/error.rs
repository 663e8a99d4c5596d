//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// No record file named on the command line
    #[error("No input given: use --event, --object, --bucket/--key or --file")]
    NoInput,

    /// Run stopped by a shutdown signal before finishing
    #[error("Run interrupted; restart to process the file from the beginning")]
    Interrupted,
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }
}
