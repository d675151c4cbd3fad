//! # Duplicate Detection
//!
//! Decides whether a present-state request is an update of an existing
//! certificate, a fresh upload, or a clash that must be rejected.
//!
//! Name matches compare bodies with carriage returns removed, so a CRLF
//! copy of a stored LF certificate is still recognised. The check for the
//! same body under a different name compares raw bodies.

use crate::model::{DesiredState, Inventory};
use crate::reconciler::ReconcileError;
use tracing::debug;

/// Result of duplicate detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateCheck {
    /// Nothing in the inventory matches; upload is needed
    Fresh,
    /// An existing certificate with the same body was found under `matched`
    Update { matched: String },
}

/// Run duplicate detection for `desired` against `inventory`
///
/// Candidates are checked in the order `name`, then rename target. The
/// first name with an equal body (or any matching name when no body was
/// supplied) makes this an update; a matching name with a different body is
/// a conflict.
pub fn check_duplicates(
    desired: &DesiredState,
    inventory: &Inventory,
) -> Result<DuplicateCheck, ReconcileError> {
    let candidates: Vec<&str> = std::iter::once(desired.name.as_str())
        .chain(desired.rename_target())
        .collect();

    if candidates.iter().any(|name| inventory.contains(name)) {
        for candidate in candidates {
            let Some(stored) = inventory.body_of(candidate) else {
                continue;
            };

            let Some(body) = &desired.body else {
                debug!("No body supplied; treating {} as an update", candidate);
                return Ok(DuplicateCheck::Update {
                    matched: candidate.to_string(),
                });
            };

            if stored.matches_ignoring_carriage_returns(body) {
                debug!("Body of {} matches stored certificate", candidate);
                return Ok(DuplicateCheck::Update {
                    matched: candidate.to_string(),
                });
            }

            return Err(ReconcileError::Conflict {
                name: candidate.to_string(),
            });
        }
    } else if let Some(body) = &desired.body {
        if !desired.allow_duplicate_body {
            if let Some(existing) = inventory.find_by_body(body) {
                return Err(ReconcileError::DuplicateContent {
                    existing_name: existing.name.clone(),
                });
            }
        }
    }

    Ok(DuplicateCheck::Fresh)
}
