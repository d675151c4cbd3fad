//! # Desired State
//!
//! What the caller wants the named server certificate to look like.

use crate::constants::DEFAULT_CERTIFICATE_PATH;
use crate::model::certificate::{CertificateBody, CertificateUpdate, PrivateKey};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Whether the certificate should exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CertificateState {
    Present,
    Absent,
}

impl CertificateState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateState::Present => "present",
            CertificateState::Absent => "absent",
        }
    }
}

/// Desired state descriptor for one server certificate
///
/// `body` and `private_key` are optional because a rename or move of an
/// existing certificate does not need them. Creating a certificate does.
#[derive(Debug, Clone)]
pub struct DesiredState {
    pub state: CertificateState,
    pub name: String,
    pub path: String,
    pub body: Option<CertificateBody>,
    pub private_key: Option<PrivateKey>,
    pub chain: Option<String>,
    pub new_name: Option<String>,
    pub new_path: Option<String>,
    pub allow_duplicate_body: bool,
}

impl DesiredState {
    fn with_state(state: CertificateState, name: impl Into<String>) -> Self {
        Self {
            state,
            name: name.into(),
            path: DEFAULT_CERTIFICATE_PATH.to_string(),
            body: None,
            private_key: None,
            chain: None,
            new_name: None,
            new_path: None,
            allow_duplicate_body: false,
        }
    }

    pub fn present(name: impl Into<String>) -> Self {
        Self::with_state(CertificateState::Present, name)
    }

    pub fn absent(name: impl Into<String>) -> Self {
        Self::with_state(CertificateState::Absent, name)
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<CertificateBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_private_key(mut self, key: PrivateKey) -> Self {
        self.private_key = Some(key);
        self
    }

    #[must_use]
    pub fn with_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    #[must_use]
    pub fn with_new_name(mut self, new_name: impl Into<String>) -> Self {
        self.new_name = Some(new_name.into());
        self
    }

    #[must_use]
    pub fn with_new_path(mut self, new_path: impl Into<String>) -> Self {
        self.new_path = Some(new_path.into());
        self
    }

    #[must_use]
    pub fn allow_duplicate_body(mut self, allow: bool) -> Self {
        self.allow_duplicate_body = allow;
        self
    }

    /// Rename target, `None` when it equals the current name
    #[must_use]
    pub fn rename_target(&self) -> Option<&str> {
        self.new_name.as_deref().filter(|n| *n != self.name)
    }

    /// Move target, `None` when it equals the current path
    #[must_use]
    pub fn move_target(&self) -> Option<&str> {
        self.new_path.as_deref().filter(|p| *p != self.path)
    }

    /// The rename/move this state asks for, after normalisation
    #[must_use]
    pub fn requested_update(&self) -> CertificateUpdate {
        CertificateUpdate {
            new_name: self.rename_target().map(ToString::to_string),
            new_path: self.move_target().map(ToString::to_string),
        }
    }
}
