//! `validate` command implementation.

use anyhow::{Context, Result};
use config_loader::{validate_aws_identities, AwsUsage};
use contracts::RelayConfig;
use serde::Serialize;
use tracing::info;

use super::{config_origin, load_config};
use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    delivery_endpoint: String,
    batch_size: usize,
    lag_threshold: f64,
    batch_delay_ms: u64,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %config_origin(&args.config), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_source = config_origin(&args.config);

    let checked = load_config(&args.config).and_then(|config| {
        if args.aws {
            validate_aws_identities(&config, AwsUsage::ALL)?;
        }
        Ok(config)
    });

    match checked {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_source,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    delivery_endpoint: config.delivery_endpoint.clone(),
                    batch_size: config.batch_size,
                    lag_threshold: config.lag_threshold,
                    batch_delay_ms: config.batch_delay_ms,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_source,
            error: Some(format!("{e:#}")),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &RelayConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.delivery_endpoint.starts_with("http://") {
        warnings.push(
            "delivery_endpoint uses plain http - the API key is sent unencrypted".to_string(),
        );
    }

    if config.batch_delay_ms == 0 {
        warnings.push(
            "batch_delay_ms is 0 - lag over threshold will not slow delivery".to_string(),
        );
    }

    if config.secret_name.is_empty() {
        warnings.push("secret_name is empty - runs need --api-key".to_string());
    }

    if config.consumer_function_name.is_empty() {
        warnings.push("consumer_function_name is empty - runs need --static-lag".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_source);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Endpoint: {}", summary.delivery_endpoint);
            println!("  Batch size: {}", summary.batch_size);
            println!("  Lag threshold: {}", summary.lag_threshold);
            println!("  Batch delay: {}ms", summary.batch_delay_ms);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_source);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
