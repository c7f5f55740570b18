//! Specification validation errors

use super::{SkiffError, Violation};

/// Creates a validation error carrying every violation found
pub fn failed(violations: Vec<Violation>) -> SkiffError {
    let report = violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n");
    SkiffError::ValidationFailed {
        count: violations.len(),
        report,
        violations,
    }
}
