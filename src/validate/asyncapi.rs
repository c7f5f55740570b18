//! AsyncAPI 2.x structural checks

use crate::document::Node;
use crate::error::Violation;

use super::check_version_prefix;

/// Channel-item keys that describe operations
const CHANNEL_OPERATIONS: &[&str] = &["publish", "subscribe"];

pub(crate) fn check(doc: &Node, violations: &mut Vec<Violation>) {
    check_version_prefix(doc, "asyncapi", &["2."], violations);

    match doc.get("channels") {
        Some(channels) => check_channels(channels, violations),
        None => violations.push(Violation {
            path: "channels".to_string(),
            message: "missing required section 'channels'".to_string(),
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

fn check_channels(channels: &Node, violations: &mut Vec<Violation>) {
    let Some(entries) = channels.as_object() else {
        violations.push(Violation {
            path: "channels".to_string(),
            message: "'channels' must be a mapping".to_string(),
        });
        return;
    };

    for (key, item) in entries {
        let item_path = format!("channels.{key}");
        let Some(channel) = item.as_object() else {
            violations.push(Violation {
                path: item_path,
                message: "channel item must be a mapping".to_string(),
            });
            continue;
        };
        for (op_key, operation) in channel {
            if CHANNEL_OPERATIONS.contains(&op_key.as_str()) && !operation.is_object() {
                violations.push(Violation {
                    path: format!("{item_path}.{op_key}"),
                    message: format!("'{op_key}' must be a mapping"),
                });
            }
        }
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
    fn test_missing_channels() {
        let violations = violations_for("asyncapi: 2.6.0\n");
        assert!(violations.iter().any(|v| v.path == "channels"));
    }

    #[test]
    fn test_publish_must_be_mapping() {
        let violations = violations_for(
            "asyncapi: 2.6.0\nchannels:\n  user/signedup:\n    publish: nope\n",
        );
        assert!(violations
            .iter()
            .any(|v| v.path == "channels.user/signedup.publish"));
    }

    #[test]
    fn test_valid_channels_pass() {
        let violations = violations_for(
            "asyncapi: 2.6.0\nchannels:\n  user/signedup:\n    subscribe:\n      message:\n        payload:\n          type: object\n",
        );
        assert!(violations.is_empty(), "unexpected: {violations:?}");
    }
}
