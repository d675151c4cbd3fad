//! # Planning
//!
//! Pure computation of the single action needed to move the inventory to
//! the desired state. No remote calls happen here.

use crate::model::{CertificateState, CertificateUpdate, DesiredState, Inventory};
use crate::reconciler::duplicate::{check_duplicates, DuplicateCheck};
use crate::reconciler::outcome::Action;
use crate::reconciler::validation::validate_desired_state;
use crate::reconciler::ReconcileError;

/// The action a run will take
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Upload a new certificate under the desired name
    Create,
    /// Rename and/or move the existing certificate `source`
    Update {
        source: String,
        update: CertificateUpdate,
    },
    /// The existing certificate `name` already matches
    Unchanged { name: String },
    /// Delete certificate `name`
    Delete { name: String },
    /// Certificate `name` does not exist
    AlreadyAbsent { name: String },
}

impl Plan {
    /// Whether executing this plan issues a mutating call
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        matches!(self, Plan::Create | Plan::Update { .. } | Plan::Delete { .. })
    }

    #[must_use]
    pub fn action(&self) -> Action {
        match self {
            Plan::Create => Action::Create,
            Plan::Update { update, .. } => Action::for_update(update),
            Plan::Unchanged { .. } => Action::Unchanged,
            Plan::Delete { .. } => Action::Delete,
            Plan::AlreadyAbsent { .. } => Action::AlreadyAbsent,
        }
    }
}

/// Compute the plan for `desired` against a fresh `inventory`
pub fn plan(desired: &DesiredState, inventory: &Inventory) -> Result<Plan, ReconcileError> {
    validate_desired_state(desired)?;

    match desired.state {
        CertificateState::Absent => {
            if inventory.contains(&desired.name) {
                Ok(Plan::Delete {
                    name: desired.name.clone(),
                })
            } else {
                Ok(Plan::AlreadyAbsent {
                    name: desired.name.clone(),
                })
            }
        }
        CertificateState::Present => match check_duplicates(desired, inventory)? {
            DuplicateCheck::Update { matched } if matched == desired.name => {
                Ok(update_or_unchanged(matched, desired.requested_update()))
            }
            DuplicateCheck::Update { matched } => {
                // A previous run already renamed it; only a pending move is left
                let update = CertificateUpdate {
                    new_name: None,
                    new_path: desired.move_target().map(ToString::to_string),
                };
                Ok(update_or_unchanged(matched, update))
            }
            DuplicateCheck::Fresh => {
                if desired.body.is_none() || desired.private_key.is_none() {
                    return Err(ReconcileError::InvalidParameters(format!(
                        "cert and key are required to upload new certificate {}",
                        desired.name
                    )));
                }
                Ok(Plan::Create)
            }
        },
    }
}

fn update_or_unchanged(source: String, update: CertificateUpdate) -> Plan {
    if update.is_empty() {
        Plan::Unchanged { name: source }
    } else {
        Plan::Update { source, update }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrivateKey;

    fn inventory() -> Inventory {
        Inventory::from_pairs([("alpha", "BODY1")])
    }

    #[test]
    fn test_create_when_new() {
        let desired = DesiredState::present("cert1")
            .with_body("X")
            .with_private_key(PrivateKey::new("K"));
        let plan = plan(&desired, &Inventory::default()).unwrap();
        assert_eq!(plan, Plan::Create);
        assert!(plan.is_mutating());
        assert_eq!(plan.action(), Action::Create);
    }

    #[test]
    fn test_create_requires_key() {
        let desired = DesiredState::present("cert1").with_body("X");
        let err = plan(&desired, &Inventory::default()).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidParameters(_)));
    }

    #[test]
    fn test_create_requires_body() {
        let desired = DesiredState::present("cert1").with_private_key(PrivateKey::new("K"));
        let err = plan(&desired, &Inventory::default()).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidParameters(_)));
    }

    #[test]
    fn test_unchanged_without_targets() {
        let desired = DesiredState::present("alpha").with_body("BODY1");
        let plan = plan(&desired, &inventory()).unwrap();
        assert_eq!(
            plan,
            Plan::Unchanged {
                name: "alpha".to_string()
            }
        );
        assert!(!plan.is_mutating());
    }

    #[test]
    fn test_rename_and_move() {
        let desired = DesiredState::present("alpha")
            .with_body("BODY1")
            .with_new_name("beta")
            .with_new_path("/new/");
        let plan = plan(&desired, &inventory()).unwrap();
        assert_eq!(plan.action(), Action::RenameAndMove);
        assert_eq!(
            plan,
            Plan::Update {
                source: "alpha".to_string(),
                update: CertificateUpdate {
                    new_name: Some("beta".to_string()),
                    new_path: Some("/new/".to_string()),
                },
            }
        );
    }

    #[test]
    fn test_rename_only_and_move_only() {
        let rename = DesiredState::present("alpha")
            .with_body("BODY1")
            .with_new_name("beta");
        assert_eq!(plan(&rename, &inventory()).unwrap().action(), Action::Rename);

        let relocate = DesiredState::present("alpha")
            .with_body("BODY1")
            .with_new_path("/new/");
        assert_eq!(plan(&relocate, &inventory()).unwrap().action(), Action::Move);
    }

    #[test]
    fn test_targets_equal_to_current_are_noop() {
        let desired = DesiredState::present("alpha")
            .with_body("BODY1")
            .with_new_name("alpha")
            .with_new_path("/");
        assert_eq!(
            plan(&desired, &inventory()).unwrap(),
            Plan::Unchanged {
                name: "alpha".to_string()
            }
        );
    }

    #[test]
    fn test_resumed_rename_is_unchanged() {
        let inventory = Inventory::from_pairs([("beta", "BODY1")]);
        let desired = DesiredState::present("alpha")
            .with_body("BODY1")
            .with_new_name("beta");
        assert_eq!(
            plan(&desired, &inventory).unwrap(),
            Plan::Unchanged {
                name: "beta".to_string()
            }
        );
    }

    #[test]
    fn test_resumed_rename_keeps_pending_move() {
        let inventory = Inventory::from_pairs([("beta", "BODY1")]);
        let desired = DesiredState::present("alpha")
            .with_body("BODY1")
            .with_new_name("beta")
            .with_new_path("/new/");
        assert_eq!(
            plan(&desired, &inventory).unwrap(),
            Plan::Update {
                source: "beta".to_string(),
                update: CertificateUpdate {
                    new_name: None,
                    new_path: Some("/new/".to_string()),
                },
            }
        );
    }

    #[test]
    fn test_absent() {
        let present = plan(&DesiredState::absent("alpha"), &inventory()).unwrap();
        assert_eq!(
            present,
            Plan::Delete {
                name: "alpha".to_string()
            }
        );
        let missing = plan(&DesiredState::absent("ghost"), &inventory()).unwrap();
        assert_eq!(
            missing,
            Plan::AlreadyAbsent {
                name: "ghost".to_string()
            }
        );
        assert!(!missing.is_mutating());
    }

    #[test]
    fn test_invalid_name_rejected_before_planning() {
        let err = plan(&DesiredState::absent(""), &inventory()).unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidParameters(_)));
    }
}
