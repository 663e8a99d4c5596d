//! Credential providers
//!
//! Contains SecretsManagerCredentialProvider, StaticCredentialProvider, and
//! CachedCredentialProvider.

mod cached;
mod secrets_manager;
mod static_key;

pub use self::cached::CachedCredentialProvider;
pub use self::secrets_manager::SecretsManagerCredentialProvider;
pub use self::static_key::StaticCredentialProvider;

use tracing::warn;

use crate::error::Result;

/// Fallible credential lookup
///
/// Every provider implements this, and its `CredentialProvider` impl collapses
/// the result with [`collapse_credential`].
#[trait_variant::make(CredentialSource: Send)]
pub trait LocalCredentialSource {
    /// Source description (used for logging)
    fn describe(&self) -> String;

    /// Fetch the current credential
    async fn try_fetch(&self) -> Result<String>;
}

/// Fail-open policy: a failed lookup becomes an empty credential
pub fn collapse_credential(result: Result<String>, source: &str) -> String {
    match result {
        Ok(credential) => credential,
        Err(e) => {
            warn!(source = %source, error = %e, "Credential unavailable, sending without one");
            String::new()
        }
    }
}
