//! Reference resolution and bundling
//!
//! Bundling always folds external-file pointers into the single output
//! document; intra-document pointers stay pointers but must resolve to an
//! existing target. Dereferencing additionally replaces every internal
//! pointer with the literal content of its target. Both walks track the
//! in-flight resolution chain so circular pointers fail with the cycle shown
//! instead of producing an infinite document.
//!
//! Sibling keys beside `$ref` augment the referenced content: the target is
//! inlined first, then siblings merge over it. External content is fully
//! resolved against its own file before inlining, so its internal pointers
//! never leak into the host document.

pub mod refs;
pub mod writer;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::document::Node;
use crate::error::{self, Result};

use refs::{is_remote, parse_ref};

/// Origin label for the in-memory merged document
const DOC_LABEL: &str = "(document)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Inline external files, keep internal pointers
    Bundle,
    /// Inline everything
    Dereference,
}

/// Resolves `$ref` pointers for a merged document
#[derive(Debug, Clone)]
pub struct Bundler {
    base_dir: PathBuf,
    allow_outside: bool,
}

impl Bundler {
    /// `base_dir` anchors relative external references
    pub fn new(base_dir: &Path, allow_outside: bool) -> Self {
        let base_dir = dunce::canonicalize(base_dir).unwrap_or_else(|_| base_dir.to_path_buf());
        Self {
            base_dir,
            allow_outside,
        }
    }

    /// Resolve external-file pointers, verify internal ones
    pub fn bundle(&self, doc: &Node) -> Result<Node> {
        self.run(doc, Mode::Bundle)
    }

    /// Replace every pointer with the literal content of its target
    pub fn dereference(&self, doc: &Node) -> Result<Node> {
        self.run(doc, Mode::Dereference)
    }

    fn run(&self, doc: &Node, mode: Mode) -> Result<Node> {
        let mut resolver = Resolver {
            base_dir: &self.base_dir,
            allow_outside: self.allow_outside,
            mode,
            cache: BTreeMap::new(),
            stack: Vec::new(),
        };
        let scope = Scope {
            root: doc,
            dir: &self.base_dir,
            label: DOC_LABEL,
        };
        resolver.transform(doc, &scope, "")
    }
}

/// Resolution frame: which document internal pointers resolve against and
/// which directory anchors relative external targets
struct Scope<'a> {
    root: &'a Node,
    dir: &'a Path,
    label: &'a str,
}

struct Resolver<'a> {
    base_dir: &'a Path,
    allow_outside: bool,
    mode: Mode,
    cache: BTreeMap<PathBuf, Node>,
    stack: Vec<String>,
}

impl Resolver<'_> {
    fn transform(&mut self, node: &Node, scope: &Scope<'_>, doc_path: &str) -> Result<Node> {
        match node {
            Node::Object(entries) => {
                if let Some(raw) = node.get("$ref").and_then(Node::as_str) {
                    let raw = raw.to_string();
                    return self.resolve_pointer(&raw, entries, scope, doc_path);
                }
                let mut out = Node::object();
                for (key, value) in entries {
                    let child = self.transform(value, scope, &join(doc_path, key))?;
                    out.insert(key.clone(), child);
                }
                Ok(out)
            }
            Node::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    out.push(self.transform(item, scope, &join(doc_path, &index.to_string()))?);
                }
                Ok(Node::Array(out))
            }
            Node::Scalar(_) => Ok(node.clone()),
        }
    }

    fn resolve_pointer(
        &mut self,
        raw: &str,
        entries: &[(String, Node)],
        scope: &Scope<'_>,
        doc_path: &str,
    ) -> Result<Node> {
        let parsed = parse_ref(raw);
        let location = location(scope, doc_path);

        if let Some(file) = parsed.file.as_deref() {
            if is_remote(file) {
                return match self.mode {
                    // Remote targets are out of the core's reach; bundling
                    // leaves them intact for the caller to resolve
                    Mode::Bundle => self.keep_pointer(raw, entries, scope, doc_path),
                    Mode::Dereference => Err(error::dangling_reference(raw, location)),
                };
            }
            return self.inline_external(raw, &parsed, entries, scope, doc_path);
        }

        let pointer = parsed.pointer.as_deref().unwrap_or("#");
        match self.mode {
            Mode::Bundle => {
                if scope.root.lookup_pointer(pointer).is_none() {
                    return Err(error::dangling_reference(raw, location));
                }
                self.keep_pointer(raw, entries, scope, doc_path)
            }
            Mode::Dereference => {
                let identity = format!("{}{pointer}", scope.label);
                if self.stack.contains(&identity) {
                    return Err(error::reference_cycle(&self.stack, &identity));
                }
                let target = scope
                    .root
                    .lookup_pointer(pointer)
                    .ok_or_else(|| error::dangling_reference(raw, location))?
                    .clone();
                self.stack.push(identity);
                let resolved = self.transform(&target, scope, doc_path)?;
                self.stack.pop();
                self.merge_siblings(resolved, entries, scope, doc_path)
            }
        }
    }

    /// Inline an external file's content, fully resolved against its own root
    fn inline_external(
        &mut self,
        raw: &str,
        parsed: &refs::ParsedRef,
        entries: &[(String, Node)],
        scope: &Scope<'_>,
        doc_path: &str,
    ) -> Result<Node> {
        let loc = location(scope, doc_path);
        let file = parsed.file.as_deref().unwrap_or_default();
        let joined = scope.dir.join(file);
        let canonical = dunce::canonicalize(&joined)
            .map_err(|_| error::dangling_reference(raw, loc.clone()))?;

        if !self.allow_outside && !canonical.starts_with(self.base_dir) {
            return Err(error::reference::outside_root(raw, loc));
        }

        let pointer = parsed.pointer.as_deref();
        let identity = format!("{}{}", canonical.display(), pointer.unwrap_or(""));
        if self.stack.contains(&identity) {
            return Err(error::reference_cycle(&self.stack, &identity));
        }

        let file_root = self.load(&canonical)?;
        let target = match pointer {
            Some(p) => file_root
                .lookup_pointer(p)
                .ok_or_else(|| error::dangling_reference(raw, loc.clone()))?
                .clone(),
            None => file_root.clone(),
        };

        let label = canonical.display().to_string();
        let dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.to_path_buf());
        let file_scope = Scope {
            root: &file_root,
            dir: &dir,
            label: &label,
        };

        self.stack.push(identity);
        let resolved = self.transform(&target, &file_scope, "")?;
        self.stack.pop();

        self.merge_siblings(resolved, entries, scope, doc_path)
    }

    /// Rebuild a `$ref` object in place, transforming its sibling values
    fn keep_pointer(
        &mut self,
        raw: &str,
        entries: &[(String, Node)],
        scope: &Scope<'_>,
        doc_path: &str,
    ) -> Result<Node> {
        let mut out = Node::object();
        for (key, value) in entries {
            if key == "$ref" {
                out.insert(key.clone(), Node::string(raw));
            } else {
                let child = self.transform(value, scope, &join(doc_path, key))?;
                out.insert(key.clone(), child);
            }
        }
        Ok(out)
    }

    /// Sibling keys beside `$ref` merge over the resolved content
    fn merge_siblings(
        &mut self,
        resolved: Node,
        entries: &[(String, Node)],
        scope: &Scope<'_>,
        doc_path: &str,
    ) -> Result<Node> {
        let siblings: Vec<&(String, Node)> =
            entries.iter().filter(|(k, _)| k != "$ref").collect();
        if siblings.is_empty() {
            return Ok(resolved);
        }
        let mut out = match resolved {
            Node::Object(_) => resolved,
            other => return Ok(other),
        };
        for (key, value) in siblings {
            let child = self.transform(value, scope, &join(doc_path, key))?;
            out.insert(key.clone(), child);
        }
        Ok(out)
    }

    fn load(&mut self, path: &Path) -> Result<Node> {
        if let Some(node) = self.cache.get(path) {
            return Ok(node.clone());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| error::file_read_failed(path, e.to_string()))?;
        let node = Node::parse(&text)
            .map_err(|e| error::template::parse_failed(path, e.to_string()))?;
        self.cache.insert(path.to_path_buf(), node.clone());
        Ok(node)
    }
}

fn location(scope: &Scope<'_>, doc_path: &str) -> String {
    let at = if doc_path.is_empty() {
        "(document root)"
    } else {
        doc_path
    };
    if scope.label == DOC_LABEL {
        at.to_string()
    } else {
        format!("{}: {at}", scope.label)
    }
}

fn join(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{base}.{key}")
    }
}

/// Whether any `$ref` marker remains anywhere in a document
#[allow(dead_code)]
pub fn contains_pointer(node: &Node) -> bool {
    match node {
        Node::Object(entries) => entries
            .iter()
            .any(|(k, v)| k == "$ref" || contains_pointer(v)),
        Node::Array(items) => items.iter().any(contains_pointer),
        Node::Scalar(_) => false,
    }
}
