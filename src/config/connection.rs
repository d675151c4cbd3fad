//! # Connection Configuration
//!
//! Where and as whom the AWS IAM client connects.

/// Connection context for the AWS provider
///
/// Every field is optional; unset fields fall back to the AWS SDK default
/// chains (environment, shared config/credentials files, instance roles).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// AWS region used for signing (IAM itself is global)
    pub region: Option<String>,
    /// Named profile from the shared AWS config files
    pub profile: Option<String>,
    /// Endpoint override, e.g. a local mock server
    pub endpoint_url: Option<String>,
    /// Role to assume before talking to IAM
    pub role_arn: Option<String>,
}
