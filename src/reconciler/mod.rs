//! # Reconciler
//!
//! Drives one server certificate toward its desired state.
//!
//! ## Reconciliation Flow
//!
//! 1. Fetch the inventory (list, then one get per certificate)
//! 2. Validate names and paths locally
//! 3. Detect updates, conflicts and duplicate bodies
//! 4. Plan a single action
//! 5. Execute it (skipped in check mode) and report the outcome

pub mod apply;
pub mod duplicate;
pub mod error;
pub mod outcome;
pub mod plan;
pub mod validation;

pub use apply::{fetch_inventory, preview, reconcile, run};
pub use duplicate::{check_duplicates, DuplicateCheck};
pub use error::{ErrorKind, FailureReport, ReconcileError};
pub use outcome::{Action, Outcome};
pub use plan::{plan, Plan};
pub use validation::{validate_certificate_name, validate_certificate_path, validate_desired_state};
