//! Reference resolution errors

use super::SkiffError;

/// Creates a dangling reference error
pub fn dangling(reference: impl Into<String>, location: impl Into<String>) -> SkiffError {
    SkiffError::DanglingReference {
        reference: reference.into(),
        location: location.into(),
    }
}

/// Creates an outside-root reference error
pub fn outside_root(reference: impl Into<String>, location: impl Into<String>) -> SkiffError {
    SkiffError::ReferenceOutsideRoot {
        reference: reference.into(),
        location: location.into(),
    }
}
