//! Document serialization
//!
//! Turns a document tree into canonical YAML or JSON text. Serializing and
//! re-parsing yields a structurally equal tree; mapping keys keep insertion
//! order, which is stable but not semantically significant.

use std::path::Path;

use serde::Serialize;

use crate::document::Node;
use crate::error::{Result, SkiffError};

/// Output text format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl OutputFormat {
    /// Format for an output path; anything but `.json` serializes as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Yaml,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yml",
            OutputFormat::Json => "json",
        }
    }
}

/// Serialize a document to text
///
/// YAML output uses the serializer's canonical two-space indentation; the
/// configured width applies to JSON output (zero means compact).
pub fn to_string(doc: &Node, format: OutputFormat, indentation: usize) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(&doc.to_yaml()).map_err(serialize_error),
        OutputFormat::Json => {
            let value = doc.to_json();
            if indentation == 0 {
                let mut text = serde_json::to_string(&value).map_err(serialize_error)?;
                text.push('\n');
                return Ok(text);
            }
            let indent = " ".repeat(indentation);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut out = Vec::new();
            let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
            value.serialize(&mut serializer).map_err(serialize_error)?;
            out.push(b'\n');
            String::from_utf8(out).map_err(|e| SkiffError::IoError {
                message: e.to_string(),
            })
        }
    }
}

fn serialize_error(err: impl std::fmt::Display) -> SkiffError {
    SkiffError::IoError {
        message: format!("serialization failed: {err}"),
    }
}
