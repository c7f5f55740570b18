//! Output writing
//!
//! Persists the bundled document to the requested path, creating
//! intermediate directories. The output format follows the path extension.
//! When the version is excluded, the configured field is removed from the
//! document before serialization; this is a naming convenience, not a spec
//! requirement.

use std::path::{Path, PathBuf};

use normpath::PathExt;

use crate::document::Node;
use crate::error::{self, Result};
use crate::serialize::{self, OutputFormat};

/// Writes the final artifact
#[derive(Debug, Clone)]
pub struct OutputWriter {
    pub indentation: usize,
    pub exclude_version: bool,
    /// Dot path of the field removed when `exclude_version` is set
    pub version_field: String,
}

impl OutputWriter {
    /// Write the document and return the absolute path written
    pub fn write(&self, doc: &Node, output: &Path) -> Result<PathBuf> {
        let mut doc = doc.clone();
        if self.exclude_version {
            // Absent field is fine; exclusion is best-effort by design of
            // the flag, the field may already be stripped
            let _ = doc.remove_dot_path(&self.version_field);
        }

        let format = OutputFormat::from_path(output);
        let text = serialize::to_string(&doc, format, self.indentation)?;

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| error::file_write_failed(parent, e.to_string()))?;
            }
        }
        std::fs::write(output, text)
            .map_err(|e| error::file_write_failed(output, e.to_string()))?;

        Ok(absolute(output))
    }
}

fn absolute(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| {
        path.normalize()
            .map(|p| p.into_path_buf())
            .unwrap_or_else(|_| path.to_path_buf())
    })
}
