//! IAM Server Certificate Reconciler Library
//!
//! Declaratively manages AWS IAM server certificates: upload, rename, move
//! and delete, with duplicate and conflict detection against the current
//! inventory. Tests are included in the module files and under `tests/`.

pub mod config;
pub mod constants;
pub mod model;
pub mod observability;
pub mod provider;
pub mod reconciler;
pub mod report;

pub use config::{CertificateParams, ConnectionConfig, ToolConfig};
pub use model::{CertificateBody, CertificateState, DesiredState, Inventory, PrivateKey};
pub use provider::{AwsIamCertificateStore, CertificateStore, InMemoryCertificateStore};
pub use reconciler::{preview, reconcile, run, Outcome, ReconcileError};
