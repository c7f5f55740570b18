//! Template function registry
//!
//! Template functions are a closed set of named, signature-typed operations
//! resolved when the render context is built, not dynamically dispatched at
//! render time. The pure derivations (operation ids, tags, file stems) live
//! here so the renderer only wires them into the engine.

use std::path::Path;

/// A built-in template function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFunction {
    /// `file_name()` — current fragment's file stem
    FileName,
    /// `unique_op_id()` — operation id derived from the fragment path
    UniqueOpId,
    /// `auto_tag()` — tag derived from the first path segment
    AutoTag,
    /// `mixin(path, ...args, indent=N)` — splice another fragment
    Mixin,
}

impl BuiltinFunction {
    pub const ALL: &'static [BuiltinFunction] = &[
        BuiltinFunction::FileName,
        BuiltinFunction::UniqueOpId,
        BuiltinFunction::AutoTag,
        BuiltinFunction::Mixin,
    ];

    /// Name the function is registered under in templates
    pub fn name(&self) -> &'static str {
        match self {
            BuiltinFunction::FileName => "file_name",
            BuiltinFunction::UniqueOpId => "unique_op_id",
            BuiltinFunction::AutoTag => "auto_tag",
            BuiltinFunction::Mixin => "mixin",
        }
    }
}

/// Registry of template functions available during a render pass
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    entries: Vec<BuiltinFunction>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl FunctionRegistry {
    /// Registry with every built-in function
    pub fn standard() -> Self {
        Self {
            entries: BuiltinFunction::ALL.to_vec(),
        }
    }

    #[allow(dead_code)]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|f| f.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BuiltinFunction> {
        self.entries.iter()
    }
}

/// File stem of a fragment: the file name up to its first `.`
pub fn fragment_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    name.split('.').next().unwrap_or_default().to_string()
}

/// Derive an operation id from a fragment's root-relative path
///
/// `paths/users/{id}/get.yml` becomes `usersIdGet`. The leading `paths` /
/// `channels` segment is dropped; remaining segments are camel-cased.
pub fn unique_operation_id(relative: &Path) -> String {
    let normalized = relative.to_string_lossy().replace('\\', "/");
    let without_ext = normalized
        .rsplit_once('/')
        .map(|(dir, file)| format!("{dir}/{}", file.split('.').next().unwrap_or(file)))
        .unwrap_or_else(|| {
            normalized
                .split('.')
                .next()
                .unwrap_or(&normalized)
                .to_string()
        });

    let tokens: Vec<String> = without_ext
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .skip_while(|t| *t == "paths" || *t == "channels")
        .map(str::to_string)
        .collect();

    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        let mut chars = token.chars();
        let Some(first) = chars.next() else { continue };
        if i == 0 {
            out.extend(first.to_lowercase());
        } else {
            out.extend(first.to_uppercase());
        }
        out.push_str(chars.as_str());
    }
    out
}

/// Derive a tag from the first path segment under `paths` / `channels`
///
/// `paths/users/{id}/get.yml` becomes `Users`; fragments outside those
/// subtrees yield an empty tag.
pub fn auto_tag(relative: &Path) -> String {
    let normalized = relative.to_string_lossy().replace('\\', "/");
    let mut segments = normalized.split('/');
    match segments.next() {
        Some("paths") | Some("channels") => {}
        _ => return String::new(),
    }
    let Some(first) = segments.next() else {
        return String::new();
    };
    // A segment with an extension is the fragment file itself, not a tag
    if first.contains('.') {
        return String::new();
    }
    let cleaned: String = first
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    let mut chars = cleaned.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
