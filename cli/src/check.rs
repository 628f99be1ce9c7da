//! `cardpath check`: report everything the validator finds.

use cardpath_core::{FlowData, ValidationOptions, ValidationResult, validate_with};
use std::fmt::Write;

pub fn check_flow(flow: &FlowData, allow_no_start: bool) -> ValidationResult {
    validate_with(
        flow,
        &ValidationOptions {
            require_start: !allow_no_start,
        },
    )
}

/// One line per finding, errors first, then a summary line.
pub fn render_report(result: &ValidationResult) -> String {
    let mut out = String::new();
    for error in &result.errors {
        let _ = writeln!(out, "error[{:?}]: {}", error.kind, error.message);
    }
    for warning in &result.warnings {
        let _ = writeln!(out, "warning[{:?}]: {}", warning.kind, warning.message);
    }
    if result.valid {
        let _ = writeln!(out, "ok ({} warnings)", result.warnings.len());
    } else {
        let _ = writeln!(
            out,
            "{} errors, {} warnings{}",
            result.errors.len(),
            result.warnings.len(),
            if result.blocks_save() { " (save blocked)" } else { "" },
        );
    }
    out
}
