//! SecretsManagerCredentialProvider - API key from the secret store

use aws_config::SdkConfig;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use contracts::CredentialProvider;
use tracing::{debug, instrument};

use super::{collapse_credential, CredentialSource};
use crate::error::{ProviderError, Result};

/// Looks the secret up on every call
pub struct SecretsManagerCredentialProvider {
    client: aws_sdk_secretsmanager::Client,
    secret_name: String,
}

impl SecretsManagerCredentialProvider {
    /// Create a provider with a client built from shared AWS config
    pub fn new(sdk_config: &SdkConfig, secret_name: impl Into<String>) -> Self {
        Self::with_client(aws_sdk_secretsmanager::Client::new(sdk_config), secret_name)
    }

    /// Create a provider around an existing client
    pub fn with_client(
        client: aws_sdk_secretsmanager::Client,
        secret_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            secret_name: secret_name.into(),
        }
    }

    pub fn secret_name(&self) -> &str {
        &self.secret_name
    }
}

impl CredentialSource for SecretsManagerCredentialProvider {
    fn describe(&self) -> String {
        format!("secretsmanager:{}", self.secret_name)
    }

    #[instrument(name = "secrets_manager_fetch", skip(self), fields(secret = %self.secret_name))]
    async fn try_fetch(&self) -> Result<String> {
        if self.secret_name.trim().is_empty() {
            return Err(ProviderError::config("secret name is empty"));
        }

        let response = self
            .client
            .get_secret_value()
            .secret_id(&self.secret_name)
            .send()
            .await
            .map_err(|e| {
                ProviderError::secret_fetch(&self.secret_name, DisplayErrorContext(&e).to_string())
            })?;

        let secret = response
            .secret_string()
            .ok_or_else(|| ProviderError::SecretMissing {
                secret_name: self.secret_name.clone(),
            })?;

        debug!("Secret retrieved");
        Ok(secret.to_string())
    }
}

impl CredentialProvider for SecretsManagerCredentialProvider {
    async fn fetch_credential(&self) -> String {
        collapse_credential(self.try_fetch().await, &self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_secretsmanager::config::{BehaviorVersion, Region};

    fn offline_client() -> aws_sdk_secretsmanager::Client {
        let config = aws_sdk_secretsmanager::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        aws_sdk_secretsmanager::Client::from_conf(config)
    }

    #[tokio::test]
    async fn test_empty_secret_name_is_a_config_error() {
        let provider = SecretsManagerCredentialProvider::with_client(offline_client(), "  ");

        let err = provider.try_fetch().await.unwrap_err();
        assert!(matches!(err, ProviderError::Config { .. }), "got: {err}");
        assert_eq!(provider.fetch_credential().await, "");
    }
}
