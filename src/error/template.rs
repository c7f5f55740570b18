//! Template rendering errors

use super::SkiffError;
use std::path::Path;

/// Format a minijinja error with its line number when the engine provides one
fn engine_reason(err: &minijinja::Error) -> String {
    match err.line() {
        Some(line) => format!("{err} (line {line})"),
        None => err.to_string(),
    }
}

/// Creates a template render error from an engine error
pub fn render_failed(path: &Path, err: &minijinja::Error) -> SkiffError {
    SkiffError::TemplateRenderFailed {
        path: path.display().to_string(),
        reason: engine_reason(err),
    }
}

/// Creates an undefined-variable error (strict mode)
pub fn undefined_variable(path: &Path, err: &minijinja::Error) -> SkiffError {
    SkiffError::UndefinedVariable {
        path: path.display().to_string(),
        reason: engine_reason(err),
    }
}

/// Creates a missing mixin target error
pub fn mixin_not_found(path: &Path, target: &Path) -> SkiffError {
    SkiffError::MixinTargetNotFound {
        path: path.display().to_string(),
        target: target.display().to_string(),
    }
}

/// Creates a mixin-outside-root error
pub fn mixin_outside_root(path: &Path, target: &Path) -> SkiffError {
    SkiffError::MixinOutsideRoot {
        path: path.display().to_string(),
        target: target.display().to_string(),
    }
}

/// Creates a fragment parse error
pub fn parse_failed(path: &Path, reason: impl Into<String>) -> SkiffError {
    SkiffError::FragmentParseFailed {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}
