//! CachedCredentialProvider - fetch once per run

use contracts::CredentialProvider;
use tokio::sync::OnceCell;
use tracing::debug;

use super::{collapse_credential, CredentialSource};
use crate::error::Result;

/// Wraps a source and reuses the first successfully fetched credential
///
/// Failed lookups are not cached; the next call tries the source again.
pub struct CachedCredentialProvider<S> {
    inner: S,
    cached: OnceCell<String>,
}

impl<S> CachedCredentialProvider<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cached: OnceCell::new(),
        }
    }

    /// Whether a credential has been cached yet
    pub fn is_cached(&self) -> bool {
        self.cached.initialized()
    }
}

impl<S: CredentialSource + Sync> CredentialSource for CachedCredentialProvider<S> {
    fn describe(&self) -> String {
        format!("cached({})", self.inner.describe())
    }

    async fn try_fetch(&self) -> Result<String> {
        let credential = self
            .cached
            .get_or_try_init(|| async {
                debug!(source = %self.inner.describe(), "Caching credential for this run");
                self.inner.try_fetch().await
            })
            .await?;
        Ok(credential.clone())
    }
}

impl<S: CredentialSource + Sync> CredentialProvider for CachedCredentialProvider<S> {
    async fn fetch_credential(&self) -> String {
        collapse_credential(self.try_fetch().await, &self.describe())
    }
}
