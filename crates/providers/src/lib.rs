//! # Providers
//!
//! Credential and lag collaborators.
//!
//! 职责：
//! - 从 Secrets Manager 获取投递 API key
//! - 从 CloudWatch 查询下游消费者的 lag
//! - 失败时按 fail-open 策略折叠为空字符串 / 0
//!
//! 每个 provider 同时实现可失败的 `CredentialSource` / `LagSource`
//! 和 contracts 中不可失败的 `CredentialProvider` / `LagMonitor`。

mod aws;
pub mod credentials;
mod error;
pub mod lag;
pub mod mock;

pub use aws::load_sdk_config;
pub use aws_config::SdkConfig;
pub use credentials::{
    collapse_credential, CachedCredentialProvider, CredentialSource, LocalCredentialSource,
    SecretsManagerCredentialProvider, StaticCredentialProvider,
};
pub use error::{ProviderError, Result};
pub use lag::{
    collapse_lag, max_datapoint, CloudWatchLagMonitor, FixedLagMonitor, LagSource, LocalLagSource,
};
pub use mock::{MockCredentialConfig, MockCredentialProvider, MockLagMonitor};
