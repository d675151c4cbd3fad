//! # Certificate Types
//!
//! Certificate material and the remote view of a stored server certificate.
//!
//! The private key is held in [`PrivateKey`], which is wiped on drop, never
//! printed by `Debug`, and deliberately has no `Serialize` impl so it cannot
//! end up in a result or failure payload.

use crate::constants::FINGERPRINT_LOG_LEN;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::borrow::Cow;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// PEM encoded certificate body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CertificateBody(String);

impl CertificateBody {
    pub fn new(pem: impl Into<String>) -> Self {
        Self(pem.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Body with every carriage return removed
    #[must_use]
    pub fn normalized(&self) -> Cow<'_, str> {
        strip_carriage_returns(&self.0)
    }

    /// Compare two bodies, ignoring CRLF vs LF differences
    #[must_use]
    pub fn matches_ignoring_carriage_returns(&self, other: &CertificateBody) -> bool {
        self.normalized() == other.normalized()
    }

    /// Short sha256 fingerprint, safe to write to logs
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        let mut hex = format!("{digest:x}");
        hex.truncate(FINGERPRINT_LOG_LEN);
        hex
    }
}

impl From<String> for CertificateBody {
    fn from(pem: String) -> Self {
        Self(pem)
    }
}

impl From<&str> for CertificateBody {
    fn from(pem: &str) -> Self {
        Self(pem.to_string())
    }
}

/// Remove carriage returns so CRLF and LF encoded PEM compare equal
#[must_use]
pub fn strip_carriage_returns(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace('\r', ""))
    } else {
        Cow::Borrowed(text)
    }
}

/// PEM encoded private key
#[derive(Clone, Zeroize, ZeroizeOnDrop, Deserialize)]
#[serde(transparent)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn new(pem: impl Into<String>) -> Self {
        Self(pem.into())
    }

    /// Raw key material, only for handing to the upload call
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(***)")
    }
}

/// Metadata of a stored server certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateMetadata {
    pub name: String,
    pub id: String,
    pub arn: String,
    pub path: String,
    pub upload_date: Option<DateTime<Utc>>,
    pub expiration: Option<DateTime<Utc>>,
}

/// A stored server certificate as returned by `get`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCertificate {
    pub metadata: CertificateMetadata,
    pub body: CertificateBody,
    pub chain: Option<String>,
}

/// Everything the upload call needs
#[derive(Debug, Clone, Copy)]
pub struct CertificateUpload<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub body: &'a CertificateBody,
    pub private_key: &'a PrivateKey,
    pub chain: Option<&'a str>,
}

/// Rename and/or move of an existing certificate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateUpdate {
    pub new_name: Option<String>,
    pub new_path: Option<String>,
}

impl CertificateUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new_name.is_none() && self.new_path.is_none()
    }
}
