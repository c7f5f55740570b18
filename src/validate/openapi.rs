//! OpenAPI 3.x structural checks

use crate::document::Node;
use crate::error::Violation;

use super::check_version_prefix;

/// HTTP methods recognized in path items
pub(crate) const HTTP_METHODS: &[&str] = &[
    "get", "post", "put", "delete", "patch", "head", "options", "trace",
];

/// Path-item keys that are not operations
pub(crate) const PATH_ITEM_EXTRAS: &[&str] =
    &["summary", "description", "servers", "parameters", "$ref"];

pub(crate) fn check(doc: &Node, violations: &mut Vec<Violation>) {
    check_version_prefix(doc, "openapi", &["3."], violations);

    let is_31 = doc
        .get("openapi")
        .and_then(Node::as_str)
        .is_some_and(|v| v.starts_with("3.1"));

    match doc.get("paths") {
        Some(paths) => check_paths(paths, true, violations),
        None if is_31 => {
            // 3.1 allows a document without paths when it carries
            // components or webhooks instead
            if doc.get("components").is_none() && doc.get("webhooks").is_none() {
                violations.push(Violation {
                    path: "(document root)".to_string(),
                    message: "one of 'paths', 'components' or 'webhooks' is required".to_string(),
                });
            }
        }
        None => violations.push(Violation {
            path: "paths".to_string(),
            message: "missing required section 'paths'".to_string(),
        }),
    }

    if let Some(components) = doc.get("components") {
        if !components.is_object() {
            violations.push(Violation {
                path: "components".to_string(),
                message: "'components' must be a mapping".to_string(),
            });
        }
    }
}

/// Shared by OpenAPI 3.x and Swagger 2.0: path keys, operations, responses
pub(crate) fn check_paths(paths: &Node, require_responses: bool, violations: &mut Vec<Violation>) {
    let Some(entries) = paths.as_object() else {
        violations.push(Violation {
            path: "paths".to_string(),
            message: "'paths' must be a mapping".to_string(),
        });
        return;
    };

    for (key, item) in entries {
        let item_path = format!("paths.{key}");
        if !key.starts_with('/') && !key.starts_with("x-") {
            violations.push(Violation {
                path: item_path.clone(),
                message: "path keys must start with '/'".to_string(),
            });
        }
        if key.starts_with("x-") {
            continue;
        }
        let Some(operations) = item.as_object() else {
            violations.push(Violation {
                path: item_path,
                message: "path item must be a mapping".to_string(),
            });
            continue;
        };
        for (op_key, operation) in operations {
            let op_path = format!("{item_path}.{op_key}");
            let lowered = op_key.to_ascii_lowercase();
            if HTTP_METHODS.contains(&lowered.as_str()) {
                check_operation(operation, &op_path, require_responses, violations);
            } else if !PATH_ITEM_EXTRAS.contains(&op_key.as_str()) && !op_key.starts_with("x-") {
                violations.push(Violation {
                    path: op_path,
                    message: format!("unknown path item key '{op_key}'"),
                });
            }
        }
    }
}

fn check_operation(
    operation: &Node,
    op_path: &str,
    require_responses: bool,
    violations: &mut Vec<Violation>,
) {
    let Some(_) = operation.as_object() else {
        violations.push(Violation {
            path: op_path.to_string(),
            message: "operation must be a mapping".to_string(),
        });
        return;
    };
    if operation.contains_key("$ref") {
        return;
    }
    if require_responses {
        match operation.get("responses") {
            None => violations.push(Violation {
                path: format!("{op_path}.responses"),
                message: "operation is missing 'responses'".to_string(),
            }),
            Some(responses) => {
                if responses.as_object().is_none_or(|entries| entries.is_empty()) {
                    violations.push(Violation {
                        path: format!("{op_path}.responses"),
                        message: "'responses' must be a non-empty mapping".to_string(),
                    });
                }
            }
        }
    }
    if let Some(parameters) = operation.get("parameters") {
        if parameters.as_array().is_none() {
            violations.push(Violation {
                path: format!("{op_path}.parameters"),
                message: "'parameters' must be a sequence".to_string(),
            });
        }
    }
}
