//! Mount-point derivation
//!
//! A fragment's place in the merged document comes from its path relative to
//! the input root:
//!
//! - every directory contributes a key named after itself; under the `paths`
//!   and `channels` subtrees consecutive directory names join into a single
//!   `/`-prefixed key (`paths/users/{id}` mounts at `paths` → `/users/{id}`)
//! - `index.*` fragments merge at their directory's mount point
//! - any other fragment merges under a key named by its file stem
//! - a non-index fragment directly in the root directory merges at the
//!   document root, where dotted top-level keys declare its mount explicitly

use std::path::Path;

use crate::context::functions::fragment_stem;

/// Subtrees whose directory components join into one URL-style key
const JOINED_SUBTREES: &[&str] = &["paths", "channels"];

/// Compute the mount path (sequence of document keys) for a fragment
pub fn mount_path(relative: &Path) -> Vec<String> {
    let normalized = relative.to_string_lossy().replace('\\', "/");
    let mut segments: Vec<&str> = normalized.split('/').collect();
    let file_name = segments.pop().unwrap_or_default();
    let stem = fragment_stem(Path::new(file_name));

    let mut mount = join_directories(&segments);

    if stem != "index" && !segments.is_empty() {
        mount.push(stem);
    }
    mount
}

/// Fold directory components into document keys
fn join_directories(segments: &[&str]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    let mut joined: Option<String> = None;

    for segment in segments {
        match joined {
            Some(ref mut url) => {
                url.push('/');
                url.push_str(segment);
            }
            None => {
                keys.push((*segment).to_string());
                if JOINED_SUBTREES.contains(segment) {
                    joined = Some(String::new());
                }
            }
        }
    }
    if let Some(url) = joined {
        if !url.is_empty() {
            keys.push(url);
        }
    }
    keys
}

/// Split a dotted top-level key into mount segments
///
/// `paths./users` splits into `["paths", "/users"]`. Keys without dots pass
/// through unchanged. Dots are separators here; URL keys containing literal
/// dots must use directory-derived mounts instead.
pub fn split_declared_path(key: &str) -> Vec<String> {
    key.split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
