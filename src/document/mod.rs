//! Document tree model
//!
//! Parsed fragments and the merged document are represented as a small
//! tagged-variant tree instead of raw serde values, so traversal and merge
//! logic is explicit at every call site:
//! - [`Node::Object`]: insertion-ordered mapping
//! - [`Node::Array`]: sequence
//! - [`Node::Scalar`]: leaf value
//!
//! Conversions to and from `serde_yaml` / `serde_json` values live here as
//! well; YAML handles JSON input since JSON is valid YAML.

/// Leaf value of a document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::String(s) => write!(f, "{s}"),
        }
    }
}

/// A node in a document tree
///
/// Object entries preserve insertion order; key ordering is not semantically
/// significant but keeps serialized output stable across runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Object(Vec<(String, Node)>),
    Array(Vec<Node>),
    Scalar(Scalar),
}

impl Node {
    /// Empty object node
    pub fn object() -> Self {
        Node::Object(Vec::new())
    }

    /// Null scalar node
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    /// String scalar node
    pub fn string(s: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(s.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(Scalar::Null))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    pub fn as_object(&self) -> Option<&[(String, Node)]> {
        match self {
            Node::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Vec<(String, Node)>> {
        match self {
            Node::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a key in an object node
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        match self {
            Node::Object(entries) => entries
                .iter_mut()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a key in an object node
    ///
    /// Returns the previous value when the key already existed. No-op on
    /// non-object nodes.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) -> Option<Node> {
        let key = key.into();
        if let Node::Object(entries) = self {
            if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
                return Some(std::mem::replace(&mut slot.1, value));
            }
            entries.push((key, value));
        }
        None
    }

    /// Remove a key from an object node
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        if let Node::Object(entries) = self {
            if let Some(pos) = entries.iter().position(|(k, _)| k == key) {
                return Some(entries.remove(pos).1);
            }
        }
        None
    }

    /// Resolve a JSON-pointer-style reference like `#/components/schemas/User`
    ///
    /// Accepts pointers with or without the leading `#`. Segments unescape
    /// `~1` to `/` and `~0` to `~`; numeric segments index into arrays.
    pub fn lookup_pointer(&self, pointer: &str) -> Option<&Node> {
        let pointer = pointer.strip_prefix('#').unwrap_or(pointer);
        if pointer.is_empty() {
            return Some(self);
        }
        let pointer = pointer.strip_prefix('/')?;
        let mut current = self;
        for segment in pointer.split('/') {
            let unescaped = segment.replace("~1", "/").replace("~0", "~");
            current = match current {
                Node::Object(_) => current.get(&unescaped)?,
                Node::Array(items) => items.get(unescaped.parse::<usize>().ok()?)?,
                Node::Scalar(_) => return None,
            };
        }
        Some(current)
    }

    /// Remove a nested key addressed by a dot path like `info.version`
    ///
    /// Returns the removed node, or `None` if any segment is missing.
    pub fn remove_dot_path(&mut self, path: &str) -> Option<Node> {
        let mut segments: Vec<&str> = path.split('.').collect();
        let last = segments.pop()?;
        let mut current = self;
        for segment in segments {
            current = current.get_mut(segment)?;
        }
        current.remove(last)
    }

    /// Parse YAML or JSON text into a node tree
    ///
    /// Empty (or whitespace-only) text parses to a null node, so an empty
    /// fragment merges as a no-op.
    pub fn parse(text: &str) -> Result<Node, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Node::null());
        }
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        Ok(Node::from_yaml(value))
    }

    /// Convert a `serde_yaml` value into a node tree
    ///
    /// Non-string mapping keys are stringified; tagged values collapse to
    /// their inner value.
    pub fn from_yaml(value: serde_yaml::Value) -> Node {
        match value {
            serde_yaml::Value::Null => Node::Scalar(Scalar::Null),
            serde_yaml::Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Scalar(Scalar::Int(i))
                } else {
                    Node::Scalar(Scalar::Float(n.as_f64().unwrap_or(0.0)))
                }
            }
            serde_yaml::Value::String(s) => Node::Scalar(Scalar::String(s)),
            serde_yaml::Value::Sequence(items) => {
                Node::Array(items.into_iter().map(Node::from_yaml).collect())
            }
            serde_yaml::Value::Mapping(mapping) => {
                let entries = mapping
                    .into_iter()
                    .map(|(k, v)| (yaml_key_to_string(k), Node::from_yaml(v)))
                    .collect();
                Node::Object(entries)
            }
            serde_yaml::Value::Tagged(tagged) => Node::from_yaml(tagged.value),
        }
    }

    /// Convert into a `serde_yaml` value for serialization
    pub fn to_yaml(&self) -> serde_yaml::Value {
        match self {
            Node::Scalar(Scalar::Null) => serde_yaml::Value::Null,
            Node::Scalar(Scalar::Bool(b)) => serde_yaml::Value::Bool(*b),
            Node::Scalar(Scalar::Int(i)) => serde_yaml::Value::Number((*i).into()),
            Node::Scalar(Scalar::Float(x)) => serde_yaml::Value::Number((*x).into()),
            Node::Scalar(Scalar::String(s)) => serde_yaml::Value::String(s.clone()),
            Node::Array(items) => {
                serde_yaml::Value::Sequence(items.iter().map(Node::to_yaml).collect())
            }
            Node::Object(entries) => {
                let mut mapping = serde_yaml::Mapping::new();
                for (k, v) in entries {
                    mapping.insert(serde_yaml::Value::String(k.clone()), v.to_yaml());
                }
                serde_yaml::Value::Mapping(mapping)
            }
        }
    }

    /// Convert into a `serde_json` value for serialization
    ///
    /// Non-finite floats have no JSON representation and collapse to null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Node::Scalar(Scalar::Null) => serde_json::Value::Null,
            Node::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(*b),
            Node::Scalar(Scalar::Int(i)) => serde_json::Value::Number((*i).into()),
            Node::Scalar(Scalar::Float(x)) => serde_json::Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Node::Scalar(Scalar::String(s)) => serde_json::Value::String(s.clone()),
            Node::Array(items) => {
                serde_json::Value::Array(items.iter().map(Node::to_json).collect())
            }
            Node::Object(entries) => {
                let mut map = serde_json::Map::with_capacity(entries.len());
                for (k, v) in entries {
                    map.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }

    /// Short kind name used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Object(_) => "mapping",
            Node::Array(_) => "sequence",
            Node::Scalar(_) => "scalar",
        }
    }
}

fn yaml_key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
