//! Fragment merge errors

use super::SkiffError;

/// Creates a merge conflict error naming both contributing files
pub fn conflict(
    location: impl Into<String>,
    first: impl Into<String>,
    second: impl Into<String>,
) -> SkiffError {
    SkiffError::MergeConflict {
        location: location.into(),
        first: first.into(),
        second: second.into(),
    }
}
