//! CloudWatchLagMonitor - consumer lag from the metric store
//!
//! 查询最近窗口内 Average 统计的最大值；没有数据点时视为 0。

use std::time::SystemTime;

use aws_config::SdkConfig;
use aws_sdk_cloudwatch::error::DisplayErrorContext;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, Statistic};
use contracts::{LagMetricConfig, LagMonitor, LagReading};
use tracing::{debug, instrument};

use super::{collapse_lag, LagSource};
use crate::error::{ProviderError, Result};

/// Queries the consumer's lag metric on every call
pub struct CloudWatchLagMonitor {
    client: aws_sdk_cloudwatch::Client,
    function_name: String,
    metric: LagMetricConfig,
}

impl CloudWatchLagMonitor {
    /// Create a monitor with a client built from shared AWS config
    pub fn new(
        sdk_config: &SdkConfig,
        function_name: impl Into<String>,
        metric: LagMetricConfig,
    ) -> Self {
        Self::with_client(
            aws_sdk_cloudwatch::Client::new(sdk_config),
            function_name,
            metric,
        )
    }

    /// Create a monitor around an existing client
    pub fn with_client(
        client: aws_sdk_cloudwatch::Client,
        function_name: impl Into<String>,
        metric: LagMetricConfig,
    ) -> Self {
        Self {
            client,
            function_name: function_name.into(),
            metric,
        }
    }

    fn dimension(&self) -> Dimension {
        Dimension::builder()
            .name(&self.metric.dimension_name)
            .value(&self.function_name)
            .build()
    }

    /// Aggregation period as the SDK expects it
    fn period(&self) -> i32 {
        i32::try_from(self.metric.period_secs).unwrap_or(i32::MAX)
    }
}

impl LagSource for CloudWatchLagMonitor {
    fn describe(&self) -> String {
        format!(
            "cloudwatch:{}/{}[{}={}]",
            self.metric.namespace,
            self.metric.metric_name,
            self.metric.dimension_name,
            self.function_name
        )
    }

    #[instrument(
        name = "cloudwatch_lag_query",
        skip(self),
        fields(function = %self.function_name, metric = %self.metric.metric_name)
    )]
    async fn try_current_lag(&self) -> Result<LagReading> {
        if self.function_name.trim().is_empty() {
            return Err(ProviderError::config("consumer function name is empty"));
        }

        let end = SystemTime::now();
        let start = end
            .checked_sub(self.metric.window())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let response = self
            .client
            .get_metric_statistics()
            .namespace(&self.metric.namespace)
            .metric_name(&self.metric.metric_name)
            .dimensions(self.dimension())
            .start_time(DateTime::from(start))
            .end_time(DateTime::from(end))
            .period(self.period())
            .statistics(Statistic::Average)
            .send()
            .await
            .map_err(|e| {
                ProviderError::metric_query(
                    &self.metric.metric_name,
                    DisplayErrorContext(&e).to_string(),
                )
            })?;

        let datapoints = response.datapoints();
        let reading = max_datapoint(datapoints.iter().map(|d| d.average().unwrap_or(0.0)));
        debug!(datapoints = datapoints.len(), lag = %reading, "Lag metric queried");
        Ok(reading)
    }
}

impl LagMonitor for CloudWatchLagMonitor {
    async fn current_lag(&self) -> LagReading {
        collapse_lag(self.try_current_lag().await, &self.describe())
    }
}

/// Largest value in `values`, or zero when there are none
pub fn max_datapoint(values: impl IntoIterator<Item = f64>) -> LagReading {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |max: Option<f64>, v| Some(max.map_or(v, |m| m.max(v))))
        .map(LagReading::new)
        .unwrap_or(LagReading::ZERO)
}
