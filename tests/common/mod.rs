//! Common test utilities
//!
//! Shared initialization for integration tests, including rustls crypto
//! provider setup and an SDK config pointed at a mock IAM endpoint.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use iam_cert::provider::AwsIamCertificateStore;
use rustls::crypto::CryptoProvider;
use std::sync::Once;

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// Uses a `Once` so it only runs once per test binary. The Pact mock server
/// may already have installed a process-wide provider, which is kept.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        let installed = CryptoProvider::get_default().is_some()
            || rustls::crypto::ring::default_provider()
                .install_default()
                .is_ok()
            || CryptoProvider::get_default().is_some();
        assert!(installed, "Failed to install rustls crypto provider");
    });
}

/// SDK config against `endpoint` with static test credentials and no retries
pub async fn mock_sdk_config(endpoint: &str) -> SdkConfig {
    init_rustls();
    let endpoint = endpoint.trim_end_matches('/');
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .endpoint_url(endpoint)
        .credentials_provider(Credentials::new(
            "AKIDTEST",
            "test-secret",
            None,
            None,
            "pact-test",
        ))
        .retry_config(RetryConfig::disabled())
        .load()
        .await
}

/// Certificate store talking to a mock IAM endpoint
pub async fn mock_store(endpoint: &str) -> AwsIamCertificateStore {
    AwsIamCertificateStore::from_sdk_config(&mock_sdk_config(endpoint).await)
}
