//! # AWS IAM Authentication
//!
//! Handles AWS SDK configuration and credential checks.
//!
//! Credentials come from the SDK default chain (environment, shared files,
//! SSO, instance/pod roles), optionally narrowed to a named profile and
//! optionally exchanged for an assumed role. The session is verified before
//! the caller touches the inventory.

use crate::config::ConnectionConfig;
use crate::constants::{ASSUME_ROLE_SESSION_NAME, DEFAULT_REGION};
use aws_config::meta::region::RegionProviderChain;
use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_iam::error::DisplayErrorContext;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure to establish a session with the identity service
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no usable AWS credentials: {0}")]
    MissingCredentials(String),
    #[error("invalid endpoint override '{0}': must start with http:// or https://")]
    InvalidEndpoint(String),
}

/// Create AWS SDK config for the given connection context
pub async fn create_sdk_config(config: &ConnectionConfig) -> Result<SdkConfig, SessionError> {
    let region = RegionProviderChain::first_try(config.region.clone().map(Region::new))
        .or_default_provider()
        .or_else(Region::new(DEFAULT_REGION));

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);

    if let Some(profile) = &config.profile {
        info!("Using AWS profile: {}", profile);
        loader = loader.profile_name(profile);
    }

    if let Some(endpoint) = &config.endpoint_url {
        validate_endpoint(endpoint)?;
        info!("Overriding IAM endpoint to {}", endpoint);
        loader = loader.endpoint_url(endpoint);
    }

    let mut sdk_config = loader.load().await;

    if let Some(role_arn) = &config.role_arn {
        info!("Assuming role {} before reconciling", role_arn);
        let provider = AssumeRoleProvider::builder(role_arn)
            .session_name(ASSUME_ROLE_SESSION_NAME)
            .configure(&sdk_config)
            .build()
            .await;
        sdk_config = sdk_config
            .into_builder()
            .credentials_provider(SharedCredentialsProvider::new(provider))
            .build();
    }

    ensure_credentials(&sdk_config).await?;
    Ok(sdk_config)
}

/// Resolve credentials once so a missing session fails before any API call
pub async fn ensure_credentials(sdk_config: &SdkConfig) -> Result<(), SessionError> {
    let provider = sdk_config.credentials_provider().ok_or_else(|| {
        SessionError::MissingCredentials("no credentials provider configured".to_string())
    })?;

    match provider.provide_credentials().await {
        Ok(credentials) => {
            debug!(
                "Resolved AWS credentials (expiry: {:?})",
                credentials.expiry()
            );
            Ok(())
        }
        Err(e) => Err(SessionError::MissingCredentials(
            DisplayErrorContext(&e).to_string(),
        )),
    }
}

/// Endpoint overrides must be http(s) URLs
pub fn validate_endpoint(endpoint: &str) -> Result<(), SessionError> {
    let endpoint = endpoint.trim();
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(SessionError::InvalidEndpoint(endpoint.to_string()));
    }

    let local = endpoint.starts_with("http://localhost") || endpoint.starts_with("http://127.0.0.1");
    if endpoint.starts_with("http://") && !local {
        warn!(
            "Endpoint override {} is plain http; private keys will be sent unencrypted",
            endpoint
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_endpoint_accepts_http_and_https() {
        assert!(validate_endpoint("http://localhost:4566").is_ok());
        assert!(validate_endpoint("https://iam.amazonaws.com").is_ok());
        assert!(validate_endpoint("http://mock.internal:1234").is_ok());
    }

    #[test]
    fn test_validate_endpoint_rejects_other_schemes() {
        for bad in ["localhost:4566", "ftp://example.com", ""] {
            assert!(
                matches!(validate_endpoint(bad), Err(SessionError::InvalidEndpoint(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_ensure_credentials_without_provider() {
        let sdk_config = SdkConfig::builder().build();
        let err = ensure_credentials(&sdk_config).await.unwrap_err();
        assert!(matches!(err, SessionError::MissingCredentials(_)));
    }

    #[tokio::test]
    async fn test_ensure_credentials_with_static_keys() {
        let credentials =
            aws_credential_types::Credentials::new("AKIDTEST", "secret", None, None, "test");
        let sdk_config = SdkConfig::builder()
            .credentials_provider(SharedCredentialsProvider::new(credentials))
            .build();
        assert!(ensure_credentials(&sdk_config).await.is_ok());
    }
}
