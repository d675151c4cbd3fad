//! # Model
//!
//! Domain types shared by the reconciler, providers and the CLI.

pub mod certificate;
pub mod desired;
pub mod inventory;

pub use certificate::{
    strip_carriage_returns, CertificateBody, CertificateMetadata, CertificateUpdate,
    CertificateUpload, PrivateKey, StoredCertificate,
};
pub use desired::{CertificateState, DesiredState};
pub use inventory::{Inventory, InventoryEntry};
