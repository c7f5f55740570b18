//! `$ref` pointer parsing
//!
//! A reference is either internal (`#/components/schemas/User`), an external
//! file (`./schemas/user.yml`), an external file with a pointer into it
//! (`./schemas.yml#/User`), or a remote URL. Remote URLs are never fetched
//! by the core.

/// A parsed `$ref` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRef {
    /// Referenced file, `None` for intra-document pointers
    pub file: Option<String>,
    /// Pointer within the target document, including the leading `#`
    pub pointer: Option<String>,
}

impl ParsedRef {
    #[allow(dead_code)]
    pub fn is_internal(&self) -> bool {
        self.file.is_none()
    }
}

/// Split a raw `$ref` string into its file and pointer parts
pub fn parse_ref(raw: &str) -> ParsedRef {
    match raw.split_once('#') {
        Some(("", pointer)) => ParsedRef {
            file: None,
            pointer: Some(format!("#{pointer}")),
        },
        Some((file, pointer)) => ParsedRef {
            file: Some(file.to_string()),
            pointer: Some(format!("#{pointer}")),
        },
        None => ParsedRef {
            file: Some(raw.to_string()),
            pointer: None,
        },
    }
}

/// Whether a reference target is a remote URL
pub fn is_remote(file: &str) -> bool {
    file.starts_with("http://") || file.starts_with("https://")
}
