//! File system errors

use super::SkiffError;
use std::path::Path;

/// Creates an input-not-found error
pub fn input_not_found(path: &Path) -> SkiffError {
    SkiffError::InputNotFound {
        path: path.display().to_string(),
    }
}

/// Creates a file read error
pub fn read_failed(path: &Path, reason: impl Into<String>) -> SkiffError {
    SkiffError::FileReadFailed {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Creates a file write error
pub fn write_failed(path: &Path, reason: impl Into<String>) -> SkiffError {
    SkiffError::FileWriteFailed {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Creates a directory walk error
pub fn walk_failed(path: &Path, reason: impl Into<String>) -> SkiffError {
    SkiffError::WalkFailed {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}
