//! # Reconcile Errors
//!
//! Every failure is terminal for the invocation. At most one mutating call is
//! ever issued, and only after validation, so there is nothing to roll back.

use crate::constants::exit_codes;
use crate::model::CertificateBody;
use crate::provider::aws::SessionError;
use crate::provider::RemoteError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Name already taken by a certificate with a different body
    #[error(
        "A cert with the name {name} already exists and has a different certificate body associated with it. Certificates cannot have the same name"
    )]
    Conflict { name: String },

    /// Same body already stored under another name and duplicates are not allowed
    #[error("This certificate already exists under the name {existing_name}")]
    DuplicateContent { existing_name: String },

    /// The backing service rejected a call; message forwarded verbatim
    #[error("{source}")]
    RemoteService {
        source: RemoteError,
        attempted_body: Option<CertificateBody>,
    },

    /// No session could be established with the identity service
    #[error("{0}")]
    MissingCredentials(String),

    /// Parameter set rejected before any remote call
    #[error("{0}")]
    InvalidParameters(String),
}

/// Tag identifying the error kind in structured output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Conflict,
    DuplicateContent,
    RemoteService,
    MissingCredentials,
    InvalidParameters,
}

impl ReconcileError {
    /// Remote failure during a present-state run; keeps the body, never the key
    #[must_use]
    pub fn remote_with_body(source: RemoteError, attempted_body: Option<CertificateBody>) -> Self {
        ReconcileError::RemoteService {
            source,
            attempted_body,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReconcileError::Conflict { .. } => ErrorKind::Conflict,
            ReconcileError::DuplicateContent { .. } => ErrorKind::DuplicateContent,
            ReconcileError::RemoteService { .. } => ErrorKind::RemoteService,
            ReconcileError::MissingCredentials(_) => ErrorKind::MissingCredentials,
            ReconcileError::InvalidParameters(_) => ErrorKind::InvalidParameters,
        }
    }

    /// Process exit code the CLI reports for this error
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::InvalidParameters => exit_codes::INVALID_PARAMETERS,
            ErrorKind::Conflict => exit_codes::CONFLICT,
            ErrorKind::DuplicateContent => exit_codes::DUPLICATE_CONTENT,
            ErrorKind::RemoteService => exit_codes::REMOTE_SERVICE,
            ErrorKind::MissingCredentials => exit_codes::MISSING_CREDENTIALS,
        }
    }

    /// Structured failure payload
    #[must_use]
    pub fn to_report(&self) -> FailureReport {
        let cert_body = match self {
            ReconcileError::RemoteService { attempted_body, .. } => attempted_body
                .as_ref()
                .map(|body| body.as_str().to_string()),
            _ => None,
        };
        FailureReport {
            changed: false,
            failed: true,
            kind: self.kind(),
            msg: self.to_string(),
            cert_body,
        }
    }
}

impl From<RemoteError> for ReconcileError {
    fn from(source: RemoteError) -> Self {
        ReconcileError::RemoteService {
            source,
            attempted_body: None,
        }
    }
}

impl From<SessionError> for ReconcileError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MissingCredentials(_) => ReconcileError::MissingCredentials(err.to_string()),
            SessionError::InvalidEndpoint(_) => ReconcileError::InvalidParameters(err.to_string()),
        }
    }
}

/// Serialisable failure payload
///
/// Only the certificate body is echoed back; there is no field that could
/// carry the private key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub changed: bool,
    pub failed: bool,
    pub kind: ErrorKind,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_body: Option<String>,
}
