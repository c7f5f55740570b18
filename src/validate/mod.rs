//! Specification validation
//!
//! Checks the merged document against the grammar of its declared
//! specification family (Swagger 2.0, OpenAPI 3.x, AsyncAPI 2.x). Every
//! violation found is collected and reported together, each with a path
//! within the document and a human-readable reason. Validation can be
//! skipped by explicit opt-in only; the document then passes through
//! unchecked.

mod asyncapi;
mod openapi;
mod schema;
mod swagger;

use crate::document::Node;
use crate::error::{self, Result, Violation};

/// The document grammar validation is performed against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFamily {
    Swagger2,
    OpenApi3,
    AsyncApi2,
}

impl SpecFamily {
    pub fn name(&self) -> &'static str {
        match self {
            SpecFamily::Swagger2 => "Swagger 2.0",
            SpecFamily::OpenApi3 => "OpenAPI 3.x",
            SpecFamily::AsyncApi2 => "AsyncAPI 2.x",
        }
    }
}

/// Detect the specification family from the version discriminator
pub fn detect_family(doc: &Node) -> Option<SpecFamily> {
    if doc.contains_key("openapi") {
        return Some(SpecFamily::OpenApi3);
    }
    if doc.contains_key("swagger") {
        return Some(SpecFamily::Swagger2);
    }
    if doc.contains_key("asyncapi") {
        return Some(SpecFamily::AsyncApi2);
    }
    None
}

/// Validate a document, collecting every violation
pub fn validate(doc: &Node) -> Result<SpecFamily> {
    let mut violations = Vec::new();

    if !doc.is_object() {
        violations.push(Violation {
            path: "(document root)".to_string(),
            message: "document root must be a mapping".to_string(),
        });
        return Err(error::validation_failed(violations));
    }

    let family = detect_family(doc);
    match family {
        Some(SpecFamily::OpenApi3) => openapi::check(doc, &mut violations),
        Some(SpecFamily::Swagger2) => swagger::check(doc, &mut violations),
        Some(SpecFamily::AsyncApi2) => asyncapi::check(doc, &mut violations),
        None => violations.push(Violation {
            path: "(document root)".to_string(),
            message: "unable to detect specification family: expected one of \
                      'openapi', 'swagger' or 'asyncapi' at the top level"
                .to_string(),
        }),
    }

    if family.is_some() {
        check_info(doc, &mut violations);
        schema::check(doc, &mut violations);
    }

    if violations.is_empty() {
        Ok(family.unwrap_or(SpecFamily::OpenApi3))
    } else {
        Err(error::validation_failed(violations))
    }
}

/// `info.title` and `info.version` are required by every family
fn check_info(doc: &Node, violations: &mut Vec<Violation>) {
    let Some(info) = doc.get("info") else {
        violations.push(Violation {
            path: "info".to_string(),
            message: "missing required section 'info'".to_string(),
        });
        return;
    };
    if !info.is_object() {
        violations.push(Violation {
            path: "info".to_string(),
            message: "'info' must be a mapping".to_string(),
        });
        return;
    }
    for field in ["title", "version"] {
        match info.get(field) {
            None => violations.push(Violation {
                path: format!("info.{field}"),
                message: format!("missing required field '{field}'"),
            }),
            Some(value) if value.as_str().is_none() => violations.push(Violation {
                path: format!("info.{field}"),
                message: format!("'{field}' must be a string"),
            }),
            Some(_) => {}
        }
    }
}

/// Version-string check shared by the family modules
pub(crate) fn check_version_prefix(
    doc: &Node,
    key: &str,
    expected_prefixes: &[&str],
    violations: &mut Vec<Violation>,
) {
    match doc.get(key).and_then(Node::as_str) {
        Some(version) => {
            if !expected_prefixes.iter().any(|p| version.starts_with(p)) {
                violations.push(Violation {
                    path: key.to_string(),
                    message: format!(
                        "unsupported {key} version '{version}' (expected {})",
                        expected_prefixes.join(" or ")
                    ),
                });
            }
        }
        None => violations.push(Violation {
            path: key.to_string(),
            message: format!("'{key}' must be a version string"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SkiffError;

    fn parse(text: &str) -> Node {
        Node::parse(text).unwrap()
    }

    const MINIMAL_OPENAPI: &str = "openapi: 3.0.3\ninfo:\n  title: Api\n  version: '1.0.0'\npaths: {}\n";

    #[test]
    fn test_minimal_openapi_passes() {
        let family = validate(&parse(MINIMAL_OPENAPI)).unwrap();
        assert_eq!(family, SpecFamily::OpenApi3);
    }

    #[test]
    fn test_minimal_swagger_passes() {
        let doc = parse("swagger: '2.0'\ninfo:\n  title: Api\n  version: '1.0.0'\npaths: {}\n");
        assert_eq!(validate(&doc).unwrap(), SpecFamily::Swagger2);
    }

    #[test]
    fn test_minimal_asyncapi_passes() {
        let doc = parse("asyncapi: 2.6.0\ninfo:\n  title: Events\n  version: '1.0.0'\nchannels: {}\n");
        assert_eq!(validate(&doc).unwrap(), SpecFamily::AsyncApi2);
    }

    #[test]
    fn test_unknown_family_is_a_violation() {
        let err = validate(&parse("info:\n  title: Api\n  version: '1'\n")).unwrap_err();
        match err {
            SkiffError::ValidationFailed { violations, .. } => {
                assert!(violations
                    .iter()
                    .any(|v| v.message.contains("specification family")));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_all_violations_are_collected() {
        // Missing info fields AND a malformed path key: both must be reported
        let doc = parse("openapi: 3.0.0\ninfo:\n  title: Api\npaths:\n  users: {}\n");
        let err = validate(&doc).unwrap_err();
        match err {
            SkiffError::ValidationFailed { count, violations, .. } => {
                assert!(count >= 2, "expected at least 2 violations, got {count}");
                assert!(violations.iter().any(|v| v.path == "info.version"));
                assert!(violations.iter().any(|v| v.path.starts_with("paths")));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_info_must_be_mapping() {
        let doc = parse("openapi: 3.0.0\ninfo: nope\npaths: {}\n");
        let err = validate(&doc).unwrap_err();
        match err {
            SkiffError::ValidationFailed { violations, .. } => {
                assert!(violations.iter().any(|v| v.path == "info"));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_version_discriminator() {
        let doc = parse("openapi: 4.0.0\ninfo:\n  title: Api\n  version: '1'\npaths: {}\n");
        let err = validate(&doc).unwrap_err();
        match err {
            SkiffError::ValidationFailed { violations, .. } => {
                assert!(violations.iter().any(|v| v.path == "openapi"));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }
}
