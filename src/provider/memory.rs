//! # In-Memory Certificate Store
//!
//! `CertificateStore` backed by a `Vec`, recording every call it receives.
//!
//! Behaves like the IAM API for the cases the reconciler relies on:
//! duplicate names on upload and rename are rejected, unknown names fail
//! with a `NoSuchEntity` style message. Individual operations can be made
//! to fail with a canned message to exercise error paths.

use crate::model::{
    CertificateBody, CertificateMetadata, CertificateUpdate, CertificateUpload, StoredCertificate,
};
use crate::provider::{CertificateStore, RemoteError, RemoteOperation};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One call received by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    List,
    Get {
        name: String,
    },
    Upload {
        name: String,
        path: String,
    },
    Update {
        name: String,
        new_name: Option<String>,
        new_path: Option<String>,
    },
    Delete {
        name: String,
    },
}

impl RecordedCall {
    #[must_use]
    pub fn operation(&self) -> RemoteOperation {
        match self {
            RecordedCall::List => RemoteOperation::List,
            RecordedCall::Get { .. } => RemoteOperation::Get,
            RecordedCall::Upload { .. } => RemoteOperation::Upload,
            RecordedCall::Update { .. } => RemoteOperation::Update,
            RecordedCall::Delete { .. } => RemoteOperation::Delete,
        }
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    certificates: Vec<StoredCertificate>,
    calls: Vec<RecordedCall>,
    failures: HashMap<RemoteOperation, String>,
    next_id: u64,
}

impl MemoryState {
    fn position(&self, name: &str) -> Option<usize> {
        self.certificates.iter().position(|c| c.metadata.name == name)
    }

    fn not_found(operation: RemoteOperation, name: &str) -> RemoteError {
        RemoteError::new(
            operation,
            format!("NoSuchEntity: The Server Certificate with name {name} cannot be found."),
        )
    }

    fn already_exists(operation: RemoteOperation, name: &str) -> RemoteError {
        RemoteError::new(
            operation,
            format!("EntityAlreadyExists: The Server Certificate with name {name} already exists."),
        )
    }

    fn injected_failure(&self, operation: RemoteOperation) -> Result<(), RemoteError> {
        match self.failures.get(&operation) {
            Some(message) => Err(RemoteError::new(operation, message.clone())),
            None => Ok(()),
        }
    }

    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        format!("ASCAMEMORY{:010}", self.next_id)
    }
}

/// In-memory `CertificateStore`
#[derive(Debug, Default)]
pub struct InMemoryCertificateStore {
    state: Mutex<MemoryState>,
}

impl InMemoryCertificateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a certificate at the default path
    #[must_use]
    pub fn with_certificate(self, name: &str, body: &str) -> Self {
        self.with_certificate_at(name, crate::constants::DEFAULT_CERTIFICATE_PATH, body)
    }

    /// Seed a certificate at `path`
    #[must_use]
    pub fn with_certificate_at(self, name: &str, path: &str, body: &str) -> Self {
        {
            let mut state = self.lock();
            let id = state.allocate_id();
            state.certificates.push(StoredCertificate {
                metadata: CertificateMetadata {
                    name: name.to_string(),
                    arn: format!("arn:aws:iam::000000000000:server-certificate{path}{name}"),
                    id,
                    path: path.to_string(),
                    upload_date: Some(Utc::now()),
                    expiration: None,
                },
                body: CertificateBody::new(body),
                chain: None,
            });
        }
        self
    }

    /// Make every call of `operation` fail with `message`
    #[must_use]
    pub fn failing_on(self, operation: RemoteOperation, message: &str) -> Self {
        self.lock().failures.insert(operation, message.to_string());
        self
    }

    /// Every call received so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Calls that changed (or tried to change) remote state
    #[must_use]
    pub fn mutating_calls(&self) -> Vec<RecordedCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation().is_mutating())
            .cloned()
            .collect()
    }

    /// Clear the call log, keeping stored certificates
    pub fn reset_calls(&self) {
        self.lock().calls.clear();
    }

    /// Stored certificate by name
    #[must_use]
    pub fn certificate(&self, name: &str) -> Option<StoredCertificate> {
        let state = self.lock();
        state.position(name).map(|i| state.certificates[i].clone())
    }

    /// Names of stored certificates, in order
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.lock()
            .certificates
            .iter()
            .map(|c| c.metadata.name.clone())
            .collect()
    }
}

#[async_trait]
impl CertificateStore for InMemoryCertificateStore {
    async fn list_certificates(&self) -> Result<Vec<CertificateMetadata>, RemoteError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::List);
        state.injected_failure(RemoteOperation::List)?;
        Ok(state
            .certificates
            .iter()
            .map(|c| c.metadata.clone())
            .collect())
    }

    async fn get_certificate(&self, name: &str) -> Result<StoredCertificate, RemoteError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Get {
            name: name.to_string(),
        });
        state.injected_failure(RemoteOperation::Get)?;
        state
            .position(name)
            .map(|i| state.certificates[i].clone())
            .ok_or_else(|| MemoryState::not_found(RemoteOperation::Get, name))
    }

    async fn upload_certificate(&self, upload: CertificateUpload<'_>) -> Result<(), RemoteError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Upload {
            name: upload.name.to_string(),
            path: upload.path.to_string(),
        });
        state.injected_failure(RemoteOperation::Upload)?;
        if state.position(upload.name).is_some() {
            return Err(MemoryState::already_exists(
                RemoteOperation::Upload,
                upload.name,
            ));
        }
        let id = state.allocate_id();
        state.certificates.push(StoredCertificate {
            metadata: CertificateMetadata {
                name: upload.name.to_string(),
                arn: format!(
                    "arn:aws:iam::000000000000:server-certificate{}{}",
                    upload.path, upload.name
                ),
                id,
                path: upload.path.to_string(),
                upload_date: Some(Utc::now()),
                expiration: None,
            },
            body: upload.body.clone(),
            chain: upload.chain.map(ToString::to_string),
        });
        Ok(())
    }

    async fn update_certificate(
        &self,
        name: &str,
        update: &CertificateUpdate,
    ) -> Result<(), RemoteError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Update {
            name: name.to_string(),
            new_name: update.new_name.clone(),
            new_path: update.new_path.clone(),
        });
        state.injected_failure(RemoteOperation::Update)?;
        let index = state
            .position(name)
            .ok_or_else(|| MemoryState::not_found(RemoteOperation::Update, name))?;
        if let Some(new_name) = &update.new_name {
            if state.position(new_name).is_some() {
                return Err(MemoryState::already_exists(
                    RemoteOperation::Update,
                    new_name,
                ));
            }
        }
        let metadata = &mut state.certificates[index].metadata;
        if let Some(new_name) = &update.new_name {
            metadata.name.clone_from(new_name);
        }
        if let Some(new_path) = &update.new_path {
            metadata.path.clone_from(new_path);
        }
        metadata.arn = format!(
            "arn:aws:iam::000000000000:server-certificate{}{}",
            metadata.path, metadata.name
        );
        Ok(())
    }

    async fn delete_certificate(&self, name: &str) -> Result<(), RemoteError> {
        let mut state = self.lock();
        state.calls.push(RecordedCall::Delete {
            name: name.to_string(),
        });
        state.injected_failure(RemoteOperation::Delete)?;
        let index = state
            .position(name)
            .ok_or_else(|| MemoryState::not_found(RemoteOperation::Delete, name))?;
        state.certificates.remove(index);
        Ok(())
    }
}
