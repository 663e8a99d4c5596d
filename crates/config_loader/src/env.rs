//! Environment-style configuration
//!
//! Maps well-known variable names onto `RelayConfig`. Unset variables keep
//! their defaults; set-but-unparseable values are errors.

use std::str::FromStr;

use contracts::{ContractError, RelayConfig};

pub const AWS_REGION: &str = "AWS_REGION";
pub const OTHER_LAMBDA_FUNCTION_NAME: &str = "OTHER_LAMBDA_FUNCTION_NAME";
pub const SECRET_NAME: &str = "SECRET_NAME";
pub const BATCH_SIZE: &str = "BATCH_SIZE";
pub const ITERATOR_AGE_THRESHOLD: &str = "ITERATOR_AGE_THRESHOLD";
pub const BATCH_DELAY_MS: &str = "BATCH_DELAY_MS";
pub const DELIVERY_ENDPOINT: &str = "DELIVERY_ENDPOINT";
pub const DELIVERY_TIMEOUT_MS: &str = "DELIVERY_TIMEOUT_MS";
pub const LAG_METRIC_NAMESPACE: &str = "LAG_METRIC_NAMESPACE";
pub const LAG_METRIC_NAME: &str = "LAG_METRIC_NAME";
pub const LAG_METRIC_DIMENSION: &str = "LAG_METRIC_DIMENSION";
pub const LAG_WINDOW_SECS: &str = "LAG_WINDOW_SECS";
pub const LAG_PERIOD_SECS: &str = "LAG_PERIOD_SECS";
pub const CACHE_CREDENTIAL: &str = "CACHE_CREDENTIAL";

/// Build a config from `(name, value)` pairs, starting from defaults
pub fn from_vars<I, K, V>(vars: I) -> Result<RelayConfig, ContractError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut config = RelayConfig::default();

    for (name, value) in vars {
        let value: String = value.into();
        let value = value.trim();
        match name.as_ref() {
            AWS_REGION => config.region = non_empty(value),
            OTHER_LAMBDA_FUNCTION_NAME => config.consumer_function_name = value.to_string(),
            SECRET_NAME => config.secret_name = value.to_string(),
            BATCH_SIZE => config.batch_size = parse_var(BATCH_SIZE, value)?,
            ITERATOR_AGE_THRESHOLD => {
                config.lag_threshold = parse_var(ITERATOR_AGE_THRESHOLD, value)?
            }
            BATCH_DELAY_MS => config.batch_delay_ms = parse_var(BATCH_DELAY_MS, value)?,
            DELIVERY_ENDPOINT => config.delivery_endpoint = value.to_string(),
            DELIVERY_TIMEOUT_MS => {
                config.delivery_timeout_ms = match value {
                    "" => None,
                    v => Some(parse_var(DELIVERY_TIMEOUT_MS, v)?),
                }
            }
            LAG_METRIC_NAMESPACE => config.lag_metric.namespace = value.to_string(),
            LAG_METRIC_NAME => config.lag_metric.metric_name = value.to_string(),
            LAG_METRIC_DIMENSION => config.lag_metric.dimension_name = value.to_string(),
            LAG_WINDOW_SECS => config.lag_metric.window_secs = parse_var(LAG_WINDOW_SECS, value)?,
            LAG_PERIOD_SECS => config.lag_metric.period_secs = parse_var(LAG_PERIOD_SECS, value)?,
            CACHE_CREDENTIAL => config.cache_credential = parse_flag(CACHE_CREDENTIAL, value)?,
            _ => {}
        }
    }

    Ok(config)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_var<T>(name: &str, value: &str) -> Result<T, ContractError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e| {
        ContractError::config_parse(format!("environment variable {name}='{value}': {e}"))
    })
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ContractError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ContractError::config_parse(format!(
            "environment variable {name}='{value}': expected a boolean"
        ))),
    }
}
