//! Error types and handling for Skiff
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`fs`]: File system errors
//! - [`template`]: Template rendering errors
//! - [`merge`]: Fragment merge errors
//! - [`cycle`]: Cycle detection errors
//! - [`validate`]: Specification validation errors
//! - [`reference`]: Reference resolution errors

// Declare submodules
pub mod cycle;
pub mod fs;
pub mod merge;
pub mod reference;
pub mod template;
pub mod validate;

// Re-export convenience constructors from submodules
#[allow(unused_imports)]
pub use cycle::{inclusion as inclusion_cycle, reference as reference_cycle, symlink_loop};
#[allow(unused_imports)]
pub use fs::{
    input_not_found, read_failed as file_read_failed, walk_failed,
    write_failed as file_write_failed,
};
#[allow(unused_imports)]
pub use merge::conflict as merge_conflict;
#[allow(unused_imports)]
pub use reference::dangling as dangling_reference;
#[allow(unused_imports)]
pub use template::{
    mixin_not_found, render_failed as template_render_failed, undefined_variable,
};
#[allow(unused_imports)]
pub use validate::failed as validation_failed;

use miette::Diagnostic;
use thiserror::Error;

/// A single specification-conformance violation
///
/// Collected by the validator; every violation found is reported, not just
/// the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path within the document (e.g. `paths./users.get`)
    pub path: String,
    /// Human-readable reason
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Main error type for Skiff operations
#[derive(Error, Diagnostic, Debug, Clone)]
pub enum SkiffError {
    // File system errors
    #[error("Input path not found: {path}")]
    #[diagnostic(
        code(skiff::fs::input_not_found),
        help("Check that the input path exists and is a directory or a fragment file")
    )]
    InputNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(skiff::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(
        code(skiff::fs::write_failed),
        help("Check that the output location is writable")
    )]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to walk directory: {path}: {reason}")]
    #[diagnostic(code(skiff::fs::walk_failed))]
    WalkFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(skiff::fs::io_error))]
    IoError { message: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(skiff::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(skiff::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    #[diagnostic(
        code(skiff::config::invalid_pattern),
        help("Include, exclude and strip-value patterns use wax glob syntax")
    )]
    InvalidPattern { pattern: String, reason: String },

    // Template errors
    #[error("Template rendering failed in {path}: {reason}")]
    #[diagnostic(code(skiff::template::render_failed))]
    TemplateRenderFailed { path: String, reason: String },

    #[error("Undefined template variable in {path}: {reason}")]
    #[diagnostic(
        code(skiff::template::undefined_variable),
        help("Define the variable with --variable or disable strict variables")
    )]
    UndefinedVariable { path: String, reason: String },

    #[error("Mixin target not found: {target} (included from {path})")]
    #[diagnostic(code(skiff::template::mixin_not_found))]
    MixinTargetNotFound { path: String, target: String },

    #[error("Mixin target escapes the input root: {target} (included from {path})")]
    #[diagnostic(
        code(skiff::template::mixin_outside_root),
        help("Set paths.allow_outside_refs in .skiffrc to permit targets outside the input root")
    )]
    MixinOutsideRoot { path: String, target: String },

    // Fragment errors
    #[error("Failed to parse fragment: {path}: {reason}")]
    #[diagnostic(
        code(skiff::fragment::parse_failed),
        help("The rendered fragment must be valid YAML or JSON")
    )]
    FragmentParseFailed { path: String, reason: String },

    // Merge errors
    #[error("Merge conflict at '{location}': defined by both {first} and {second}")]
    #[diagnostic(
        code(skiff::merge::conflict),
        help("Add a --strip-value override rule for this location to permit replacement")
    )]
    MergeConflict {
        location: String,
        first: String,
        second: String,
    },

    // Cycle errors
    #[error("Circular fragment inclusion: {chain}")]
    #[diagnostic(code(skiff::cycle::inclusion))]
    InclusionCycle { chain: String },

    #[error("Circular reference resolution: {chain}")]
    #[diagnostic(
        code(skiff::cycle::reference),
        help("A document with circular $ref pointers cannot be fully dereferenced")
    )]
    ReferenceCycle { chain: String },

    #[error("Symlink loop detected at: {path}")]
    #[diagnostic(code(skiff::cycle::symlink))]
    SymlinkCycle { path: String },

    // Validation errors
    #[error("Specification validation failed with {count} violation(s)\n{report}")]
    #[diagnostic(
        code(skiff::validate::failed),
        help("Pass --skip-validation to bypass specification validation")
    )]
    ValidationFailed {
        count: usize,
        report: String,
        violations: Vec<Violation>,
    },

    // Reference errors
    #[error("Dangling reference '{reference}' at {location}")]
    #[diagnostic(
        code(skiff::reference::dangling),
        help("Every $ref pointer must resolve to an existing target")
    )]
    DanglingReference { reference: String, location: String },

    #[error("Reference escapes the input root: '{reference}' at {location}")]
    #[diagnostic(
        code(skiff::reference::outside_root),
        help("Set paths.allow_outside_refs in .skiffrc to permit targets outside the input root")
    )]
    ReferenceOutsideRoot { reference: String, location: String },
}

impl From<std::io::Error> for SkiffError {
    fn from(err: std::io::Error) -> Self {
        SkiffError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SkiffError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SkiffError::InputNotFound {
            path: "/missing/root".to_string(),
        };
        assert_eq!(err.to_string(), "Input path not found: /missing/root");
    }

    #[test]
    fn test_error_code() {
        let err = SkiffError::InputNotFound {
            path: "x".to_string(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("skiff::fs::input_not_found".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SkiffError = io_err.into();
        assert!(matches!(err, SkiffError::IoError { .. }));
    }

    #[test]
    fn test_merge_conflict_names_both_files() {
        let err = merge_conflict("paths./users.get.summary", "a.yml", "b.yml");
        let rendered = err.to_string();
        assert!(rendered.contains("a.yml"));
        assert!(rendered.contains("b.yml"));
        assert!(rendered.contains("paths./users.get.summary"));
    }

    #[test]
    fn test_validation_failed_reports_every_violation() {
        let violations = vec![
            Violation {
                path: "info".to_string(),
                message: "missing required field 'title'".to_string(),
            },
            Violation {
                path: "paths.users".to_string(),
                message: "path keys must start with '/'".to_string(),
            },
        ];
        let err = validation_failed(violations);
        let rendered = err.to_string();
        assert!(rendered.contains("2 violation(s)"));
        assert!(rendered.contains("missing required field 'title'"));
        assert!(rendered.contains("path keys must start with '/'"));
    }

    #[test]
    fn test_dangling_reference() {
        let err = dangling_reference("#/components/schemas/Ghost", "paths./users.get");
        assert!(matches!(err, SkiffError::DanglingReference { .. }));
        assert!(err.to_string().contains("#/components/schemas/Ghost"));
    }

    #[test]
    fn test_violation_display() {
        let v = Violation {
            path: "info.version".to_string(),
            message: "must be a string".to_string(),
        };
        assert_eq!(v.to_string(), "info.version: must be a string");
    }
}
