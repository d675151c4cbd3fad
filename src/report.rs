//! # Result Reporting
//!
//! Renders a run's outcome or failure for stdout and maps it to a process
//! exit code.

use crate::constants::exit_codes;
use crate::reconciler::{Outcome, ReconcileError};
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

/// Rendering of the result document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty printed JSON object
    #[default]
    Json,
    /// One `key: value` line per field
    Text,
}

/// Render any serialisable result document
pub fn render<T: Serialize>(document: &T, format: OutputFormat) -> Result<String> {
    let value = serde_json::to_value(document).context("Failed to serialize result")?;
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&value).context("Failed to render JSON result")
        }
        OutputFormat::Text => Ok(render_text(&value)),
    }
}

fn render_text(value: &Value) -> String {
    let Value::Object(fields) = value else {
        return value.to_string();
    };

    let mut out = String::new();
    for (key, field) in fields {
        match field {
            Value::String(s) if s.contains('\n') => {
                out.push_str(&format!("{key}:\n"));
                for line in s.lines() {
                    out.push_str(&format!("  {line}\n"));
                }
            }
            Value::String(s) => out.push_str(&format!("{key}: {s}\n")),
            other => out.push_str(&format!("{key}: {other}\n")),
        }
    }
    out
}

/// Render the result of a run
pub fn render_result(
    result: &std::result::Result<Outcome, ReconcileError>,
    format: OutputFormat,
) -> Result<String> {
    match result {
        Ok(outcome) => render(outcome, format),
        Err(err) => render(&err.to_report(), format),
    }
}

/// Exit code for the result of a run
#[must_use]
pub fn exit_code(result: &std::result::Result<Outcome, ReconcileError>) -> u8 {
    match result {
        Ok(_) => exit_codes::SUCCESS,
        Err(err) => err.exit_code(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_rendering() {
        let rendered = render(&Outcome::deleted("cert1"), OutputFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["changed"], true);
        assert_eq!(parsed["deleted_cert"], "cert1");
    }

    #[test]
    fn test_text_rendering() {
        let rendered = render(&Outcome::already_absent("cert1"), OutputFormat::Text).unwrap();
        assert!(rendered.contains("changed: false\n"));
        assert!(rendered.contains("action: already_absent\n"));
        assert!(rendered.contains("msg: Certificate with the name cert1 already absent\n"));
    }

    #[test]
    fn test_text_rendering_indents_multiline_values() {
        let document = serde_json::json!({"cert_body": "line1\nline2"});
        let rendered = render(&document, OutputFormat::Text).unwrap();
        assert_eq!(rendered, "cert_body:\n  line1\n  line2\n");
    }

    #[test]
    fn test_failure_rendering_and_exit_code() {
        let result: std::result::Result<Outcome, ReconcileError> =
            Err(ReconcileError::DuplicateContent {
                existing_name: "alpha".to_string(),
            });
        let rendered = render_result(&result, OutputFormat::Json).unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["failed"], true);
        assert_eq!(parsed["kind"], "duplicate_content");
        assert_eq!(exit_code(&result), exit_codes::DUPLICATE_CONTENT);
    }

    #[test]
    fn test_success_exit_code() {
        let result: std::result::Result<Outcome, ReconcileError> =
            Ok(Outcome::deleted("cert1"));
        assert_eq!(exit_code(&result), exit_codes::SUCCESS);
    }
}
