//! # Inventory
//!
//! Snapshot of the certificates currently stored remotely, as (name, body)
//! pairs in listing order. Fetched fresh for every run and never cached.

use crate::model::certificate::CertificateBody;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub name: String,
    pub body: CertificateBody,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
}

impl Inventory {
    #[must_use]
    pub fn new(entries: Vec<InventoryEntry>) -> Self {
        Self { entries }
    }

    /// Build from `(name, body)` pairs
    pub fn from_pairs<N, B>(pairs: impl IntoIterator<Item = (N, B)>) -> Self
    where
        N: Into<String>,
        B: Into<CertificateBody>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(name, body)| InventoryEntry {
                    name: name.into(),
                    body: body.into(),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Stored body of the named certificate
    #[must_use]
    pub fn body_of(&self, name: &str) -> Option<&CertificateBody> {
        self.entries.iter().find(|e| e.name == name).map(|e| &e.body)
    }

    /// First entry whose body is byte-for-byte equal to `body`
    #[must_use]
    pub fn find_by_body(&self, body: &CertificateBody) -> Option<&InventoryEntry> {
        self.entries.iter().find(|e| &e.body == body)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
