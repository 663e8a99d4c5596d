//! Runtime collaborator selection
//!
//! A run either talks to AWS or uses the static stand-ins given on the
//! command line (`--api-key`, `--static-lag`).

use contracts::{CredentialProvider, LagMonitor, LagReading, RelayConfig};
use providers::{
    CachedCredentialProvider, CloudWatchLagMonitor, FixedLagMonitor, SdkConfig,
    SecretsManagerCredentialProvider, StaticCredentialProvider,
};

/// Credential provider chosen at runtime
pub enum Credentials {
    Static(StaticCredentialProvider),
    SecretsManager(SecretsManagerCredentialProvider),
    Cached(CachedCredentialProvider<SecretsManagerCredentialProvider>),
}

impl Credentials {
    /// Static key when given, otherwise Secrets Manager (cached when configured)
    pub fn select(
        config: &RelayConfig,
        api_key: Option<&str>,
        sdk_config: Option<&SdkConfig>,
    ) -> Self {
        match (api_key, sdk_config) {
            (None, Some(sdk_config)) => {
                let provider =
                    SecretsManagerCredentialProvider::new(sdk_config, &config.secret_name);
                if config.cache_credential {
                    Self::Cached(CachedCredentialProvider::new(provider))
                } else {
                    Self::SecretsManager(provider)
                }
            }
            (key, _) => Self::Static(StaticCredentialProvider::new(key.unwrap_or_default())),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Static(_) => "static",
            Self::SecretsManager(_) => "secrets-manager",
            Self::Cached(_) => "secrets-manager (cached)",
        }
    }
}

impl CredentialProvider for Credentials {
    async fn fetch_credential(&self) -> String {
        match self {
            Self::Static(provider) => provider.fetch_credential().await,
            Self::SecretsManager(provider) => provider.fetch_credential().await,
            Self::Cached(provider) => provider.fetch_credential().await,
        }
    }
}

/// Lag monitor chosen at runtime
pub enum Lag {
    Fixed(FixedLagMonitor),
    CloudWatch(CloudWatchLagMonitor),
}

impl Lag {
    /// Fixed reading when given, otherwise CloudWatch
    pub fn select(
        config: &RelayConfig,
        static_lag: Option<f64>,
        sdk_config: Option<&SdkConfig>,
    ) -> Self {
        match (static_lag, sdk_config) {
            (None, Some(sdk_config)) => Self::CloudWatch(CloudWatchLagMonitor::new(
                sdk_config,
                &config.consumer_function_name,
                config.lag_metric.clone(),
            )),
            (value, _) => Self::Fixed(FixedLagMonitor::new(value.unwrap_or_default())),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Fixed(_) => "fixed",
            Self::CloudWatch(_) => "cloudwatch",
        }
    }
}

impl LagMonitor for Lag {
    async fn current_lag(&self) -> LagReading {
        match self {
            Self::Fixed(monitor) => monitor.current_lag().await,
            Self::CloudWatch(monitor) => monitor.current_lag().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_stand_ins_without_aws() {
        let config = RelayConfig::default();

        let credentials = Credentials::select(&config, Some("local-key"), None);
        assert_eq!(credentials.describe(), "static");
        assert_eq!(credentials.fetch_credential().await, "local-key");

        let lag = Lag::select(&config, Some(1500.0), None);
        assert_eq!(lag.describe(), "fixed");
        assert_eq!(lag.current_lag().await.value(), 1500.0);
    }
}
