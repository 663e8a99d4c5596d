//! 配置校验模块
//!
//! 校验规则：
//! - batch_size >= 1
//! - lag_threshold 为有限非负数
//! - delivery_endpoint 为 http/https URL
//! - lag metric 名称非空，window/period >= 1
//! - 使用 AWS 协作者时 secret_name / consumer_function_name 必填

use contracts::{ContractError, RelayConfig};
use validator::Validate;

/// 校验 RelayConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &RelayConfig) -> Result<(), ContractError> {
    validate_fields(config)?;
    validate_lag_threshold(config)?;
    validate_endpoint_scheme(config)?;
    Ok(())
}

/// Derived per-field rules
fn validate_fields(config: &RelayConfig) -> Result<(), ContractError> {
    config.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors.errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        ContractError::config_validation(fields.join(", "), errors.to_string())
    })
}

/// 校验阈值
fn validate_lag_threshold(config: &RelayConfig) -> Result<(), ContractError> {
    if !config.lag_threshold.is_finite() {
        return Err(ContractError::config_validation(
            "lag_threshold",
            format!("lag_threshold must be finite, got {}", config.lag_threshold),
        ));
    }
    Ok(())
}

/// 校验投递地址协议
fn validate_endpoint_scheme(config: &RelayConfig) -> Result<(), ContractError> {
    let endpoint = config.delivery_endpoint.as_str();
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(ContractError::config_validation(
            "delivery_endpoint",
            format!("delivery_endpoint must be an http(s) URL, got '{endpoint}'"),
        ));
    }
    Ok(())
}

/// Which AWS collaborators a run talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwsUsage {
    /// API key from Secrets Manager
    pub secret: bool,
    /// Lag from CloudWatch
    pub lag_metric: bool,
}

impl AwsUsage {
    pub const ALL: Self = Self {
        secret: true,
        lag_metric: true,
    };
}

/// 校验 AWS 协作者所需的标识
///
/// Local runs with a static key or fixed lag skip the matching check.
pub fn validate_aws_identities(
    config: &RelayConfig,
    usage: AwsUsage,
) -> Result<(), ContractError> {
    if usage.secret && config.secret_name.trim().is_empty() {
        return Err(ContractError::config_validation(
            "secret_name",
            "secret_name cannot be empty",
        ));
    }
    if usage.lag_metric && config.consumer_function_name.trim().is_empty() {
        return Err(ContractError::config_validation(
            "consumer_function_name",
            "consumer_function_name cannot be empty",
        ));
    }
    Ok(())
}
