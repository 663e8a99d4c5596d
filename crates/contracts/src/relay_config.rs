//! RelayConfig - Config Loader 输出
//!
//! Explicit run configuration: collaborator identities, batching and pacing.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete relay configuration
///
/// Defaulted and validated once at startup, then passed down by reference.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RelayConfig {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// Region used by every AWS client (None = SDK default chain)
    #[serde(default)]
    pub region: Option<String>,

    /// Downstream consumer whose lag is watched (metric dimension value)
    #[serde(default)]
    pub consumer_function_name: String,

    /// Secret holding the delivery API key
    #[serde(default)]
    pub secret_name: String,

    /// Records per batch
    #[serde(default = "default_batch_size")]
    #[validate(range(min = 1))]
    pub batch_size: usize,

    /// Lag above which the dispatcher pauses between batches
    #[serde(default = "default_lag_threshold")]
    #[validate(range(min = 0.0))]
    pub lag_threshold: f64,

    /// Pause applied after a batch whose lag reading exceeded the threshold
    #[serde(default = "default_batch_delay_ms")]
    pub batch_delay_ms: u64,

    /// Base URL; each record is posted to `{delivery_endpoint}/{id}`
    #[serde(default = "default_delivery_endpoint")]
    #[validate(url)]
    pub delivery_endpoint: String,

    /// Optional per-request timeout (unset = wait indefinitely)
    #[serde(default)]
    #[validate(range(min = 1))]
    pub delivery_timeout_ms: Option<u64>,

    /// Lag metric identity and query window
    #[serde(default)]
    #[validate(nested)]
    pub lag_metric: LagMetricConfig,

    /// Fetch the credential once per run instead of once per delivery
    #[serde(default)]
    pub cache_credential: bool,
}

fn default_batch_size() -> usize {
    10
}

fn default_lag_threshold() -> f64 {
    1000.0
}

fn default_batch_delay_ms() -> u64 {
    5000
}

fn default_delivery_endpoint() -> String {
    "https://www.example.com".to_string()
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            version: ConfigVersion::default(),
            region: None,
            consumer_function_name: String::new(),
            secret_name: String::new(),
            batch_size: default_batch_size(),
            lag_threshold: default_lag_threshold(),
            batch_delay_ms: default_batch_delay_ms(),
            delivery_endpoint: default_delivery_endpoint(),
            delivery_timeout_ms: None,
            lag_metric: LagMetricConfig::default(),
            cache_credential: false,
        }
    }
}

impl RelayConfig {
    /// Pacing pause as a duration
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    /// Per-request timeout as a duration
    pub fn delivery_timeout(&self) -> Option<Duration> {
        self.delivery_timeout_ms.map(Duration::from_millis)
    }
}

/// Lag metric query parameters
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LagMetricConfig {
    /// Metric namespace
    #[serde(default = "default_namespace")]
    #[validate(length(min = 1))]
    pub namespace: String,

    /// Metric name
    #[serde(default = "default_metric_name")]
    #[validate(length(min = 1))]
    pub metric_name: String,

    /// Dimension name identifying the consumer
    #[serde(default = "default_dimension_name")]
    #[validate(length(min = 1))]
    pub dimension_name: String,

    /// Trailing window queried on each check (seconds)
    #[serde(default = "default_window_secs")]
    #[validate(range(min = 1))]
    pub window_secs: u64,

    /// Aggregation period (seconds)
    #[serde(default = "default_period_secs")]
    #[validate(range(min = 1))]
    pub period_secs: u32,
}

fn default_namespace() -> String {
    "AWS/Lambda".to_string()
}

fn default_metric_name() -> String {
    "IteratorAge".to_string()
}

fn default_dimension_name() -> String {
    "FunctionName".to_string()
}

fn default_window_secs() -> u64 {
    60
}

fn default_period_secs() -> u32 {
    60
}

impl Default for LagMetricConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            metric_name: default_metric_name(),
            dimension_name: default_dimension_name(),
            window_secs: default_window_secs(),
            period_secs: default_period_secs(),
        }
    }
}

impl LagMetricConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}
