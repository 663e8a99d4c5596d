//! `info` command implementation.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::RelayConfig;
use tracing::info;

use super::{config_origin, load_config};
use crate::cli::InfoArgs;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %config_origin(&args.config), "Loading configuration info");

    let config = load_config(&args.config)?;

    if args.json {
        let json = ConfigLoader::to_json(&config).context("Failed to serialize config")?;
        println!("{}", json);
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}

fn print_config_info(config: &RelayConfig) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║               Batch Relay Configuration                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("☁️  AWS");
    println!("   ├─ Version: {:?}", config.version);
    println!(
        "   ├─ Region: {}",
        config.region.as_deref().unwrap_or("(SDK default)")
    );
    println!("   ├─ Secret: {}", or_unset(&config.secret_name));
    println!(
        "   └─ Consumer function: {}",
        or_unset(&config.consumer_function_name)
    );

    println!("\n📤 Delivery");
    println!(
        "   ├─ Endpoint: {}/{{id}}",
        config.delivery_endpoint.trim_end_matches('/')
    );
    match config.delivery_timeout() {
        Some(timeout) => println!("   ├─ Timeout: {}ms", timeout.as_millis()),
        None => println!("   ├─ Timeout: none"),
    }
    println!(
        "   └─ Credential: {}",
        if config.cache_credential {
            "fetched once per run"
        } else {
            "fetched per record"
        }
    );

    let metric = &config.lag_metric;
    println!("\n⚙️  Pacing");
    println!("   ├─ Batch size: {}", config.batch_size);
    println!("   ├─ Lag threshold: {}", config.lag_threshold);
    println!("   ├─ Batch delay: {}ms", config.batch_delay_ms);
    println!(
        "   └─ Lag metric: {}/{} [{}] Average over {}s, period {}s",
        metric.namespace,
        metric.metric_name,
        metric.dimension_name,
        metric.window_secs,
        metric.period_secs
    );
}
