//! Relay orchestrator - wires collaborators into the dispatcher.

use anyhow::{Context, Result};
use config_loader::{validate_aws_identities, AwsUsage};
use contracts::{RecordSource, RelayConfig};
use dispatcher::{BatchDispatcher, BatchPlan, DispatchReport, DispatcherConfig, HttpDeliveryClient};
use providers::SdkConfig;
use tracing::info;

use super::collaborators::{Credentials, Lag};
use super::input::RunInput;

/// Everything a run needs before collaborators are built
#[derive(Debug, Clone)]
pub struct RelayPlan {
    /// Validated configuration
    pub config: RelayConfig,
    /// Record file location
    pub input: RunInput,
    /// Static API key (skips Secrets Manager)
    pub api_key: Option<String>,
    /// Static lag reading (skips CloudWatch)
    pub static_lag: Option<f64>,
}

impl RelayPlan {
    /// AWS collaborators this run will use
    pub fn aws_usage(&self) -> AwsUsage {
        AwsUsage {
            secret: self.api_key.is_none(),
            lag_metric: self.static_lag.is_none(),
        }
    }

    /// Fetch and parse the input, then plan batches without delivering
    pub async fn dry_run(&self) -> Result<BatchPlan> {
        let sdk_config = self.load_sdk_config(self.input.needs_aws()).await;
        let source = self.input.clone().into_source(sdk_config.as_ref())?;

        let records = source
            .fetch_records()
            .await
            .with_context(|| format!("Failed to read records from {}", self.input))?;

        Ok(BatchPlan::new(records.len(), self.config.batch_size))
    }

    /// Build collaborators and dispatch every record
    pub async fn run(self) -> Result<DispatchReport> {
        let usage = self.aws_usage();
        validate_aws_identities(&self.config, usage)?;

        let needs_aws = self.input.needs_aws() || usage.secret || usage.lag_metric;
        let sdk_config = self.load_sdk_config(needs_aws).await;

        let source = self.input.clone().into_source(sdk_config.as_ref())?;
        let credentials =
            Credentials::select(&self.config, self.api_key.as_deref(), sdk_config.as_ref());
        let lag = Lag::select(&self.config, self.static_lag, sdk_config.as_ref());

        info!(
            input = %self.input,
            endpoint = %self.config.delivery_endpoint,
            credentials = credentials.describe(),
            lag = lag.describe(),
            batch_size = self.config.batch_size,
            threshold = self.config.lag_threshold,
            "Collaborators ready"
        );

        let delivery = HttpDeliveryClient::from_config(&self.config, credentials)?;
        let mut dispatcher =
            BatchDispatcher::new(DispatcherConfig::from(&self.config), delivery, lag);

        dispatcher
            .run(&source)
            .await
            .with_context(|| format!("Failed to process {}", self.input))
    }

    async fn load_sdk_config(&self, needed: bool) -> Option<SdkConfig> {
        if !needed {
            return None;
        }
        Some(providers::load_sdk_config(self.config.region.as_deref()).await)
    }
}
