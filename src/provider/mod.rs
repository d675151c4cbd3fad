//! # Provider Modules
//!
//! Backends that store server certificates.
//!
//! Each backend implements the `CertificateStore` trait:
//! - `aws`: AWS IAM server certificates
//! - `memory`: in-process store used by tests and local dry runs

use crate::model::{CertificateMetadata, CertificateUpdate, CertificateUpload, StoredCertificate};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Remote call that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    List,
    Get,
    Upload,
    Update,
    Delete,
}

impl RemoteOperation {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteOperation::List => "list",
            RemoteOperation::Get => "get",
            RemoteOperation::Upload => "upload",
            RemoteOperation::Update => "update",
            RemoteOperation::Delete => "delete",
        }
    }

    /// Whether the operation changes remote state
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            RemoteOperation::Upload | RemoteOperation::Update | RemoteOperation::Delete
        )
    }
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure returned by the backing service
///
/// The message is forwarded verbatim; error codes are not interpreted.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub operation: RemoteOperation,
    pub message: String,
}

impl RemoteError {
    pub fn new(operation: RemoteOperation, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Client capability for server certificates
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// List metadata of every stored certificate, in service order
    async fn list_certificates(&self) -> Result<Vec<CertificateMetadata>, RemoteError>;

    /// Fetch body and metadata of one certificate
    async fn get_certificate(&self, name: &str) -> Result<StoredCertificate, RemoteError>;

    /// Upload a new certificate
    async fn upload_certificate(&self, upload: CertificateUpload<'_>) -> Result<(), RemoteError>;

    /// Rename and/or move an existing certificate
    async fn update_certificate(
        &self,
        name: &str,
        update: &CertificateUpdate,
    ) -> Result<(), RemoteError>;

    /// Delete a certificate
    async fn delete_certificate(&self, name: &str) -> Result<(), RemoteError>;
}

// Provider implementations
pub mod aws;
pub mod memory;

pub use aws::AwsIamCertificateStore;
pub use memory::{InMemoryCertificateStore, RecordedCall};
