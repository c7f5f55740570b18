//! Fragment merging
//!
//! Composes rendered, parsed fragments into one document tree. Mapping keys
//! merge recursively, sequences concatenate in walker order, and scalar
//! collisions are fatal unless an override rule explicitly permits
//! replacement. Provenance (which file contributed which key) is tracked for
//! error messages only.

pub mod mount;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::document::Node;
use crate::error::{self, Result};

/// A rendered fragment parsed into a document tree
#[derive(Debug, Clone)]
pub struct ParsedFragment {
    pub absolute_path: PathBuf,
    pub relative_path: PathBuf,
    pub node: Node,
}

/// The composed document plus per-key provenance
#[derive(Debug, Clone)]
pub struct MergedDocument {
    pub root: Node,
    provenance: BTreeMap<String, String>,
}

impl MergedDocument {
    fn new() -> Self {
        Self {
            root: Node::object(),
            provenance: BTreeMap::new(),
        }
    }

    /// Source file that contributed a document path, or its nearest
    /// recorded ancestor
    #[allow(dead_code)]
    pub fn provenance_of(&self, path: &str) -> Option<&str> {
        if let Some(file) = self.provenance.get(path) {
            return Some(file);
        }
        let mut current = path;
        while let Some((parent, _)) = current.rsplit_once('.') {
            if let Some(file) = self.provenance.get(parent) {
                return Some(file);
            }
            current = parent;
        }
        None
    }
}

/// An override rule permitting replacement at matching document paths
///
/// Rules are dotted paths where a segment is a literal key, `*` (any one
/// key), or a trailing `**` (any suffix).
#[derive(Debug, Clone)]
pub struct OverrideRule {
    pattern: String,
    segments: Vec<String>,
}

impl OverrideRule {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn matches(&self, path: &[&str]) -> bool {
        let trailing_any = self.segments.last().map(String::as_str) == Some("**");
        if trailing_any {
            let prefix = &self.segments[..self.segments.len() - 1];
            if path.len() < prefix.len() {
                return false;
            }
            return prefix
                .iter()
                .zip(path)
                .all(|(rule, key)| rule == "*" || rule == key);
        }
        self.segments.len() == path.len()
            && self
                .segments
                .iter()
                .zip(path)
                .all(|(rule, key)| rule == "*" || rule == key)
    }

    /// Number of literal segments, used for precedence
    fn specificity(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| *s != "*" && *s != "**")
            .count()
    }
}

/// The set of override rules in effect for a merge pass
///
/// When several rules match the same path, the rule with the most literal
/// segments wins; ties resolve to the rule declared last.
#[derive(Debug, Clone, Default)]
pub struct OverridePolicy {
    rules: Vec<OverrideRule>,
}

impl OverridePolicy {
    pub fn new(patterns: Vec<String>) -> Result<Self> {
        let mut rules = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let segments: Vec<String> = pattern.split('.').map(str::to_string).collect();
            if segments.iter().any(String::is_empty) {
                return Err(crate::error::SkiffError::InvalidPattern {
                    pattern,
                    reason: "empty path segment".to_string(),
                });
            }
            if let Some(pos) = segments.iter().position(|s| s == "**") {
                if pos != segments.len() - 1 {
                    return Err(crate::error::SkiffError::InvalidPattern {
                        pattern,
                        reason: "'**' is only allowed as the final segment".to_string(),
                    });
                }
            }
            rules.push(OverrideRule { pattern, segments });
        }
        Ok(Self { rules })
    }

    /// The rule that decides a path, honoring precedence
    pub fn winning_rule(&self, path: &str) -> Option<&OverrideRule> {
        let segments: Vec<&str> = path.split('.').collect();
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.matches(&segments))
            .max_by_key(|(index, rule)| (rule.specificity(), *index))
            .map(|(_, rule)| rule)
    }

    fn permits(&self, path: &str) -> bool {
        self.winning_rule(path).is_some()
    }
}

/// Composes parsed fragments into a [`MergedDocument`]
#[derive(Debug, Clone, Default)]
pub struct Merger {
    policy: OverridePolicy,
}

impl Merger {
    pub fn new(policy: OverridePolicy) -> Self {
        Self { policy }
    }

    /// Merge fragments in walker order
    pub fn merge(&self, fragments: Vec<ParsedFragment>) -> Result<MergedDocument> {
        let mut doc = MergedDocument::new();

        for fragment in fragments {
            // An empty fragment merges as a no-op
            if fragment.node.is_null() {
                continue;
            }

            let file = fragment.absolute_path.display().to_string();
            let base = mount::mount_path(&fragment.relative_path);

            match fragment.node {
                Node::Object(entries) => {
                    for (key, value) in entries {
                        let mut segments = base.clone();
                        segments.extend(mount::split_declared_path(&key));
                        self.merge_at(&mut doc.root, &mut doc.provenance, &segments, value, &file)?;
                    }
                }
                other if base.is_empty() => {
                    return Err(error::merge_conflict(
                        "(document root)",
                        "the document root mapping",
                        format!("{file} ({})", other.kind_name()),
                    ));
                }
                other => {
                    self.merge_at(&mut doc.root, &mut doc.provenance, &base, other, &file)?;
                }
            }
        }

        Ok(doc)
    }

    /// Merge `value` at the mount path, creating absent levels
    fn merge_at(
        &self,
        root: &mut Node,
        provenance: &mut BTreeMap<String, String>,
        segments: &[String],
        value: Node,
        file: &str,
    ) -> Result<()> {
        let mut path = String::new();
        let mut current = root;

        for segment in segments {
            path = join_path(&path, segment);
            if !current.contains_key(segment) {
                current.insert(segment.clone(), Node::object());
                provenance.insert(path.clone(), file.to_string());
            } else if !current.get(segment).is_some_and(Node::is_object) {
                // The mount path runs through a non-mapping value
                if self.policy.permits(&path) {
                    current.insert(segment.clone(), Node::object());
                    provenance.insert(path.clone(), file.to_string());
                } else {
                    let first = provenance
                        .get(&path)
                        .cloned()
                        .or_else(|| nearest_provenance(provenance, &path))
                        .unwrap_or_else(|| "an earlier fragment".to_string());
                    return Err(error::merge_conflict(path, first, file));
                }
            }
            current = match current.get_mut(segment) {
                Some(node) => node,
                None => return Ok(()),
            };
        }

        merge_node(current, value, &path, file, provenance, &self.policy)
    }
}

/// Recursive deep merge of `incoming` into `existing`
fn merge_node(
    existing: &mut Node,
    incoming: Node,
    path: &str,
    file: &str,
    provenance: &mut BTreeMap<String, String>,
    policy: &OverridePolicy,
) -> Result<()> {
    match (existing, incoming) {
        (target @ Node::Object(_), Node::Object(entries)) => {
            for (key, value) in entries {
                let child_path = join_path(path, &key);
                if target.contains_key(&key) {
                    if let Some(slot) = target.get_mut(&key) {
                        merge_node(slot, value, &child_path, file, provenance, policy)?;
                    }
                } else {
                    target.insert(key, value);
                    provenance.insert(child_path, file.to_string());
                }
            }
            Ok(())
        }
        (Node::Array(items), Node::Array(mut incoming_items)) => {
            // Sequences concatenate in walker order
            items.append(&mut incoming_items);
            Ok(())
        }
        (slot, incoming) => {
            if policy.permits(path) {
                *slot = incoming;
                provenance.insert(path.to_string(), file.to_string());
                Ok(())
            } else {
                let first = provenance
                    .get(path)
                    .cloned()
                    .or_else(|| nearest_provenance(provenance, path))
                    .unwrap_or_else(|| "an earlier fragment".to_string());
                Err(error::merge_conflict(path, first, file))
            }
        }
    }
}

fn nearest_provenance(provenance: &BTreeMap<String, String>, path: &str) -> Option<String> {
    let mut current = path;
    while let Some((parent, _)) = current.rsplit_once('.') {
        if let Some(file) = provenance.get(parent) {
            return Some(file.clone());
        }
        current = parent;
    }
    None
}

fn join_path(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{base}.{key}")
    }
}
