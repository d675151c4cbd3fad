//! # Reconcile Outcome
//!
//! Successful result of a run. Which contextual fields are filled depends on
//! the action taken; unset fields are left out of the serialised form.

use crate::model::{CertificateUpdate, DesiredState, StoredCertificate};
use crate::reconciler::plan::Plan;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Tag for the action a run took (or would take in check mode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Rename,
    Move,
    RenameAndMove,
    Unchanged,
    Delete,
    AlreadyAbsent,
}

impl Action {
    /// Action for an update request; an empty update is `Unchanged`
    #[must_use]
    pub fn for_update(update: &CertificateUpdate) -> Self {
        match (&update.new_name, &update.new_path) {
            (Some(_), Some(_)) => Action::RenameAndMove,
            (Some(_), None) => Action::Rename,
            (None, Some(_)) => Action::Move,
            (None, None) => Action::Unchanged,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Rename => "rename",
            Action::Move => "move",
            Action::RenameAndMove => "rename_and_move",
            Action::Unchanged => "unchanged",
            Action::Delete => "delete",
            Action::AlreadyAbsent => "already_absent",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub changed: bool,
    pub action: Action,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_cert: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl Outcome {
    fn new(changed: bool, action: Action) -> Self {
        Self {
            changed,
            action,
            name: None,
            original_name: None,
            new_name: None,
            cert_path: None,
            original_path: None,
            new_path: None,
            cert_body: None,
            upload_date: None,
            expiration_date: None,
            deleted_cert: None,
            msg: None,
        }
    }

    fn with_stored(mut self, stored: &StoredCertificate) -> Self {
        self.cert_body = Some(stored.body.as_str().to_string());
        self.upload_date = stored.metadata.upload_date;
        self.expiration_date = stored.metadata.expiration;
        self
    }

    /// Certificate uploaded; `stored` is the re-fetched result
    #[must_use]
    pub fn created(stored: &StoredCertificate) -> Self {
        let mut outcome = Self::new(true, Action::Create).with_stored(stored);
        outcome.name = Some(stored.metadata.name.clone());
        outcome.cert_path = Some(stored.metadata.path.clone());
        outcome
    }

    /// Certificate renamed and/or moved; `original` is the metadata fetched before the call
    #[must_use]
    pub fn updated(original: &StoredCertificate, update: &CertificateUpdate) -> Self {
        let action = Action::for_update(update);
        let mut outcome = Self::new(action != Action::Unchanged, action).with_stored(original);
        let original_name = original.metadata.name.clone();
        let original_path = original.metadata.path.clone();

        if update.new_name.is_some() {
            outcome.original_name = Some(original_name);
            outcome.new_name.clone_from(&update.new_name);
        } else {
            outcome.name = Some(original_name);
        }

        if update.new_path.is_some() {
            outcome.original_path = Some(original_path);
            outcome.new_path.clone_from(&update.new_path);
        } else {
            outcome.cert_path = Some(original_path);
        }

        outcome
    }

    /// Existing certificate already matches
    #[must_use]
    pub fn unchanged(stored: &StoredCertificate, msg: impl Into<String>) -> Self {
        let mut outcome = Self::new(false, Action::Unchanged).with_stored(stored);
        outcome.name = Some(stored.metadata.name.clone());
        outcome.cert_path = Some(stored.metadata.path.clone());
        outcome.msg = Some(msg.into());
        outcome
    }

    #[must_use]
    pub fn deleted(name: &str) -> Self {
        let mut outcome = Self::new(true, Action::Delete);
        outcome.deleted_cert = Some(name.to_string());
        outcome
    }

    #[must_use]
    pub fn already_absent(name: &str) -> Self {
        let mut outcome = Self::new(false, Action::AlreadyAbsent);
        outcome.msg = Some(format!("Certificate with the name {name} already absent"));
        outcome
    }

    /// Check-mode report of what `plan` would do; no remote metadata is included
    #[must_use]
    pub fn planned(plan: &Plan, desired: &DesiredState) -> Self {
        let mut outcome = Self::new(plan.is_mutating(), plan.action());
        match plan {
            Plan::Create => {
                outcome.name = Some(desired.name.clone());
                outcome.cert_path = Some(desired.path.clone());
                outcome.cert_body = desired.body.as_ref().map(|b| b.as_str().to_string());
                outcome.msg = Some(format!("Would upload certificate {}", desired.name));
            }
            Plan::Update { source, update } => {
                if update.new_name.is_some() {
                    outcome.original_name = Some(source.clone());
                    outcome.new_name.clone_from(&update.new_name);
                } else {
                    outcome.name = Some(source.clone());
                }
                outcome.new_path.clone_from(&update.new_path);
                outcome.msg = Some(format!("Would update certificate {source}"));
            }
            Plan::Unchanged { name } => {
                outcome.name = Some(name.clone());
                outcome.msg = Some(unchanged_message(desired, name));
            }
            Plan::Delete { name } => {
                outcome.deleted_cert = Some(name.clone());
                outcome.msg = Some(format!("Would delete certificate {name}"));
            }
            Plan::AlreadyAbsent { name } => {
                outcome.msg = Some(format!("Certificate with the name {name} already absent"));
            }
        }
        outcome
    }
}

/// Message for a present-state run that found nothing to do
pub(crate) fn unchanged_message(desired: &DesiredState, matched: &str) -> String {
    if matched == desired.name {
        "No new path or name specified. No changes made".to_string()
    } else {
        format!(
            "Certificate {} already renamed to {matched}. No changes made",
            desired.name
        )
    }
}
