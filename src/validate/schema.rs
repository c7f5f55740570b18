//! Schema-level checks shared by every family
//!
//! Walks the whole document and verifies combination keywords and `$ref`
//! pointer shapes wherever they appear.

use crate::document::Node;
use crate::error::Violation;

/// Keywords whose value must be a non-empty sequence of schema mappings
const COMBINATION_KEYWORDS: &[&str] = &["allOf", "anyOf", "oneOf"];

pub(crate) fn check(doc: &Node, violations: &mut Vec<Violation>) {
    walk(doc, "", violations);
}

fn walk(node: &Node, path: &str, violations: &mut Vec<Violation>) {
    match node {
        Node::Object(entries) => {
            for (key, value) in entries {
                let child_path = join(path, key);
                if key == "$ref" {
                    check_ref(value, &child_path, violations);
                } else if COMBINATION_KEYWORDS.contains(&key.as_str()) {
                    check_combination(key, value, &child_path, violations);
                }
                walk(value, &child_path, violations);
            }
        }
        Node::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                walk(item, &join(path, &index.to_string()), violations);
            }
        }
        Node::Scalar(_) => {}
    }
}

fn check_ref(value: &Node, path: &str, violations: &mut Vec<Violation>) {
    match value.as_str() {
        Some(target) if target.is_empty() => violations.push(Violation {
            path: path.to_string(),
            message: "'$ref' must not be empty".to_string(),
        }),
        Some(_) => {}
        None => violations.push(Violation {
            path: path.to_string(),
            message: "'$ref' must be a string".to_string(),
        }),
    }
}

fn check_combination(keyword: &str, value: &Node, path: &str, violations: &mut Vec<Violation>) {
    match value.as_array() {
        Some(items) if items.is_empty() => violations.push(Violation {
            path: path.to_string(),
            message: format!("'{keyword}' must not be empty"),
        }),
        Some(items) => {
            for (index, item) in items.iter().enumerate() {
                if !item.is_object() {
                    violations.push(Violation {
                        path: join(path, &index.to_string()),
                        message: format!("'{keyword}' entries must be schema mappings"),
                    });
                }
            }
        }
        None => violations.push(Violation {
            path: path.to_string(),
            message: format!("'{keyword}' must be a sequence of schemas"),
        }),
    }
}

fn join(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{base}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violations_for(text: &str) -> Vec<Violation> {
        let doc = Node::parse(text).unwrap();
        let mut violations = Vec::new();
        check(&doc, &mut violations);
        violations
    }

    #[test]
    fn test_valid_all_of_passes() {
        let violations = violations_for(
            "components:\n  schemas:\n    Pet:\n      allOf:\n        - $ref: '#/components/schemas/Animal'\n        - type: object\n",
        );
        assert!(violations.is_empty(), "unexpected: {violations:?}");
    }

    #[test]
    fn test_empty_all_of_is_a_violation() {
        let violations = violations_for("schema:\n  allOf: []\n");
        assert!(violations.iter().any(|v| v.message.contains("must not be empty")));
    }

    #[test]
    fn test_scalar_one_of_is_a_violation() {
        let violations = violations_for("schema:\n  oneOf: everything\n");
        assert!(violations
            .iter()
            .any(|v| v.message.contains("sequence of schemas")));
    }

    #[test]
    fn test_non_mapping_any_of_entry() {
        let violations = violations_for("schema:\n  anyOf:\n    - just a string\n");
        assert!(violations
            .iter()
            .any(|v| v.message.contains("schema mappings")));
    }

    #[test]
    fn test_ref_must_be_string() {
        let violations = violations_for("schema:\n  $ref: 42\n");
        assert!(violations.iter().any(|v| v.message.contains("must be a string")));
    }

    #[test]
    fn test_empty_ref_is_a_violation() {
        let violations = violations_for("schema:\n  $ref: ''\n");
        assert!(violations.iter().any(|v| v.message.contains("must not be empty")));
    }
}
