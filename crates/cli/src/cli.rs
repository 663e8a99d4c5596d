//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Batch Relay - paced record delivery driven by downstream lag
#[derive(Parser, Debug)]
#[command(
    name = "batch-relay",
    author,
    version,
    about = "Deliver CSV records to an HTTP endpoint in lag-paced batches",
    long_about = "Reads an id,name,interests record file from object storage (or a local file),\n\
                  posts every record to {endpoint}/{id} with an API key, and pauses between \n\
                  batches while the downstream consumer's iterator age is over the threshold."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "BATCH_RELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "BATCH_RELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch the record file and deliver every record
    Run(RunArgs),

    /// Validate configuration without running
    Validate(ValidateArgs),

    /// Display the effective configuration
    Info(InfoArgs),
}

/// Where configuration comes from
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file (TOML or JSON). Without it, configuration is read
    /// from environment variables.
    #[arg(short, long, env = "BATCH_RELAY_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Object-storage event notification (JSON) naming the record file
    #[arg(long, conflicts_with_all = ["bucket", "file", "object"])]
    pub event: Option<PathBuf>,

    /// Record file as an `s3://bucket/key` URI
    #[arg(long, conflicts_with_all = ["bucket", "file"])]
    pub object: Option<String>,

    /// Bucket holding the record file
    #[arg(long, requires = "key", conflicts_with = "file")]
    pub bucket: Option<String>,

    /// Object key of the record file
    #[arg(long, requires = "bucket")]
    pub key: Option<String>,

    /// Local record file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Override the delivery endpoint from configuration
    #[arg(long, env = "BATCH_RELAY_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Override the batch size from configuration
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Use this API key instead of fetching it from Secrets Manager
    #[arg(long, env = "BATCH_RELAY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Use this lag reading instead of querying CloudWatch
    #[arg(long)]
    pub static_lag: Option<f64>,

    /// Parse the input and print the batch plan without delivering anything
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "BATCH_RELAY_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Also require the identities AWS collaborators need
    #[arg(long)]
    pub aws: bool,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_object() {
        let cli = Cli::try_parse_from([
            "batch-relay",
            "run",
            "--bucket",
            "uploads",
            "--key",
            "records.csv",
            "--static-lag",
            "0",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.bucket.as_deref(), Some("uploads"));
        assert_eq!(args.key.as_deref(), Some("records.csv"));
        assert_eq!(args.static_lag, Some(0.0));
        assert!(!args.dry_run);
    }

    #[test]
    fn test_bucket_requires_key() {
        let result = Cli::try_parse_from(["batch-relay", "run", "--bucket", "uploads"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_event_conflicts_with_file() {
        let result = Cli::try_parse_from([
            "batch-relay",
            "run",
            "--event",
            "event.json",
            "--file",
            "records.csv",
        ]);
        assert!(result.is_err());
    }
}
