//! Mock 协作者
//!
//! 用于单元测试和端到端测试，支持注入失败场景。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use contracts::{CredentialProvider, LagMonitor, LagReading};

use crate::credentials::{collapse_credential, CredentialSource};
use crate::error::{ProviderError, Result};
use crate::lag::{collapse_lag, LagSource};

/// Mock credential 配置
#[derive(Debug, Clone, Default)]
pub struct MockCredentialConfig {
    /// 成功时返回的 credential
    pub credential: String,
    /// 前 N 次调用失败
    pub fail_first: usize,
}

/// Mock credential provider
pub struct MockCredentialProvider {
    config: MockCredentialConfig,
    calls: Arc<AtomicUsize>,
}

impl MockCredentialProvider {
    /// 总是成功的 provider
    pub fn new(credential: impl Into<String>) -> Self {
        Self::with_config(MockCredentialConfig {
            credential: credential.into(),
            fail_first: 0,
        })
    }

    /// 总是失败的 provider
    pub fn failing() -> Self {
        Self::with_config(MockCredentialConfig {
            credential: String::new(),
            fail_first: usize::MAX,
        })
    }

    pub fn with_config(config: MockCredentialConfig) -> Self {
        Self {
            config,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// 调用计数器（可在 provider 被移走后继续读取）
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CredentialSource for MockCredentialProvider {
    fn describe(&self) -> String {
        "mock-credential".to_string()
    }

    async fn try_fetch(&self) -> Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.config.fail_first {
            return Err(ProviderError::secret_fetch("mock", "injected failure"));
        }
        Ok(self.config.credential.clone())
    }
}

impl CredentialProvider for MockCredentialProvider {
    async fn fetch_credential(&self) -> String {
        collapse_credential(self.try_fetch().await, &self.describe())
    }
}

/// Scripted lag monitor
///
/// Replays queued readings in order; `None` entries simulate a failed query.
/// Once the script runs out every call reads `fallback`.
pub struct MockLagMonitor {
    script: Mutex<VecDeque<Option<f64>>>,
    fallback: f64,
    calls: Arc<AtomicUsize>,
}

impl MockLagMonitor {
    /// Always reports `value`
    pub fn constant(value: f64) -> Self {
        Self::scripted(Vec::new(), value)
    }

    /// Every query fails
    pub fn failing() -> Self {
        Self::scripted(Vec::new(), f64::NAN)
    }

    pub fn scripted(script: impl IntoIterator<Item = Option<f64>>, fallback: f64) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_value(&self) -> Option<f64> {
        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        match scripted {
            Some(entry) => entry,
            None if self.fallback.is_nan() => None,
            None => Some(self.fallback),
        }
    }
}

impl LagSource for MockLagMonitor {
    fn describe(&self) -> String {
        "mock-lag".to_string()
    }

    async fn try_current_lag(&self) -> Result<LagReading> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.next_value()
            .map(LagReading::new)
            .ok_or_else(|| ProviderError::metric_query("mock", "injected failure"))
    }
}

impl LagMonitor for MockLagMonitor {
    async fn current_lag(&self) -> LagReading {
        collapse_lag(self.try_current_lag().await, &self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failing_credential_reads_empty() {
        let provider = MockCredentialProvider::failing();
        assert_eq!(provider.fetch_credential().await, "");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_scripted_lag_replays_then_falls_back() {
        let monitor = MockLagMonitor::scripted([Some(1500.0), None, Some(10.0)], 7.0);
        assert_eq!(monitor.current_lag().await.value(), 1500.0);
        assert_eq!(monitor.current_lag().await, LagReading::ZERO);
        assert_eq!(monitor.current_lag().await.value(), 10.0);
        assert_eq!(monitor.current_lag().await.value(), 7.0);
        assert_eq!(monitor.call_count(), 4);
    }

    #[tokio::test]
    async fn test_failing_lag_reads_zero() {
        let monitor = MockLagMonitor::failing();
        assert!(monitor.try_current_lag().await.is_err());
        assert_eq!(monitor.current_lag().await, LagReading::ZERO);
    }
}
