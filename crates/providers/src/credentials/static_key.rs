//! StaticCredentialProvider - fixed API key

use contracts::CredentialProvider;

use super::CredentialSource;
use crate::error::Result;

/// Returns the same credential every time (local runs, tests)
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialProvider {
    credential: String,
}

impl StaticCredentialProvider {
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into(),
        }
    }
}

impl CredentialSource for StaticCredentialProvider {
    fn describe(&self) -> String {
        "static".to_string()
    }

    async fn try_fetch(&self) -> Result<String> {
        Ok(self.credential.clone())
    }
}

impl CredentialProvider for StaticCredentialProvider {
    async fn fetch_credential(&self) -> String {
        self.credential.clone()
    }
}
