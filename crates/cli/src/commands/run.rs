//! `run` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::RelayConfig;
use dispatcher::COMPLETION_MESSAGE;
use tracing::{error, info, warn};

use super::{config_origin, load_config};
use crate::cli::RunArgs;
use crate::error::CliError;
use crate::pipeline::{RelayPlan, RunInput};

/// Execute the `run` command
pub async fn run_relay(args: &RunArgs) -> Result<()> {
    info!(config = %config_origin(&args.config), "Loading configuration");

    let mut config = load_config(&args.config)?;

    // Apply CLI overrides
    if let Some(ref endpoint) = args.endpoint {
        info!(endpoint = %endpoint, "Overriding delivery endpoint from CLI");
        config.delivery_endpoint = endpoint.clone();
    }
    if let Some(batch_size) = args.batch_size {
        info!(batch_size = batch_size, "Overriding batch size from CLI");
        config.batch_size = batch_size;
    }
    ConfigLoader::validate(&config).context("Invalid configuration after CLI overrides")?;

    let input = RunInput::from_args(args)?;
    info!(input = %input, "Input resolved");

    let plan = RelayPlan {
        config,
        input,
        api_key: args.api_key.clone(),
        static_lag: args.static_lag,
    };

    // Dry run - parse input, print the batch plan and exit
    if args.dry_run {
        info!("Dry run mode - no records will be delivered");
        let batches = plan.dry_run().await?;
        print_config_summary(&plan.config);
        println!("{batches}");
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    let shutdown_signal = setup_shutdown_signal();

    info!("Starting relay...");

    tokio::select! {
        result = plan.run() => {
            let report = result.context("Relay run failed")?;
            info!(
                records = report.total_records,
                delivered = report.counts.delivered,
                rejected = report.counts.rejected,
                errored = report.counts.errored,
                duration_secs = report.elapsed.as_secs_f64(),
                "Relay completed"
            );
            println!("\n{report}\n");
            println!("{COMPLETION_MESSAGE}");
            Ok(())
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping relay...");
            Err(CliError::Interrupted.into())
        }
    }
}

/// Setup Ctrl+C and SIGTERM signal handlers
///
/// A handler that cannot be installed never fires.
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &RelayConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Delivery:");
    println!("  Endpoint: {}", config.delivery_endpoint);
    match config.delivery_timeout() {
        Some(timeout) => println!("  Timeout: {}ms", timeout.as_millis()),
        None => println!("  Timeout: none"),
    }
    println!("\nPacing:");
    println!("  Batch size: {}", config.batch_size);
    println!("  Lag threshold: {}", config.lag_threshold);
    println!("  Batch delay: {}ms", config.batch_delay_ms);
    println!(
        "  Lag metric: {}/{} [{}={}]",
        config.lag_metric.namespace,
        config.lag_metric.metric_name,
        config.lag_metric.dimension_name,
        config.consumer_function_name
    );
    println!();
}
