//! Swagger 2.0 structural checks

use crate::document::Node;
use crate::error::Violation;

use super::openapi::check_paths;
use super::check_version_prefix;

pub(crate) fn check(doc: &Node, violations: &mut Vec<Violation>) {
    check_version_prefix(doc, "swagger", &["2.0"], violations);

    match doc.get("paths") {
        Some(paths) => check_paths(paths, true, violations),
        None => violations.push(Violation {
            path: "paths".to_string(),
            message: "missing required section 'paths'".to_string(),
        }),
    }

    for section in ["definitions", "parameters", "responses", "securityDefinitions"] {
        if let Some(node) = doc.get(section) {
            if !node.is_object() {
                violations.push(Violation {
                    path: section.to_string(),
                    message: format!("'{section}' must be a mapping"),
                });
            }
        }
    }
}
