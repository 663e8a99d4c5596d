//! Command implementations.

mod info;
mod run;
mod validate;

pub use info::run_info;
pub use run::run_relay;
pub use validate::run_validate;

use anyhow::{Context, Result};
use config_loader::{ConfigLoader, RelayConfig};

use crate::cli::ConfigArgs;
use crate::error::CliError;

/// Load configuration from the given file, or from the environment
fn load_config(args: &ConfigArgs) -> Result<RelayConfig> {
    match &args.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()).into());
            }
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => ConfigLoader::from_env().context("Failed to load config from environment"),
    }
}

/// Human-readable name of the configuration origin
fn config_origin(args: &ConfigArgs) -> String {
    args.config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "environment".to_string())
}
