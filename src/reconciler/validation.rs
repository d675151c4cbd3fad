//! # Certificate Name and Path Validation
//!
//! Validates names and paths locally so malformed input fails before any
//! remote call.

use crate::constants::{MAX_CERTIFICATE_NAME_LEN, MAX_CERTIFICATE_PATH_LEN};
use crate::model::DesiredState;
use crate::reconciler::ReconcileError;
use regex::Regex;
use std::sync::LazyLock;

static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_+=,.@-]+$")
        .expect("Failed to compile certificate name regex - this should never happen")
});

static PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(/|/[\x21-\x7E]+/)$")
        .expect("Failed to compile certificate path regex - this should never happen")
});

/// Validate a server certificate name
/// Format: alphanumeric plus `_+=,.@-`
/// Length: 1-128 characters
pub fn validate_certificate_name(name: &str, field_name: &str) -> Result<(), ReconcileError> {
    if name.is_empty() {
        return Err(ReconcileError::InvalidParameters(format!(
            "{field_name} cannot be empty"
        )));
    }

    if name.len() > MAX_CERTIFICATE_NAME_LEN {
        return Err(ReconcileError::InvalidParameters(format!(
            "{field_name} '{name}' exceeds maximum length of {MAX_CERTIFICATE_NAME_LEN} characters (got {})",
            name.len()
        )));
    }

    if !NAME_REGEX.is_match(name) {
        return Err(ReconcileError::InvalidParameters(format!(
            "{field_name} '{name}' must contain only alphanumeric characters and _+=,.@-"
        )));
    }

    Ok(())
}

/// Validate a server certificate path
/// Format: `/` or `/segment/.../` using printable ASCII
/// Length: 1-512 characters
pub fn validate_certificate_path(path: &str, field_name: &str) -> Result<(), ReconcileError> {
    if path.len() > MAX_CERTIFICATE_PATH_LEN {
        return Err(ReconcileError::InvalidParameters(format!(
            "{field_name} '{path}' exceeds maximum length of {MAX_CERTIFICATE_PATH_LEN} characters (got {})",
            path.len()
        )));
    }

    if !PATH_REGEX.is_match(path) {
        return Err(ReconcileError::InvalidParameters(format!(
            "{field_name} '{path}' must begin and end with '/' and contain only printable ASCII characters"
        )));
    }

    Ok(())
}

/// Validate every name and path of a desired state
pub fn validate_desired_state(desired: &DesiredState) -> Result<(), ReconcileError> {
    validate_certificate_name(&desired.name, "name")?;
    validate_certificate_path(&desired.path, "path")?;

    if let Some(new_name) = &desired.new_name {
        validate_certificate_name(new_name, "new_name")?;
    }
    if let Some(new_path) = &desired.new_path {
        validate_certificate_path(new_path, "new_path")?;
    }

    Ok(())
}
