//! Project configuration (.skiffrc)
//!
//! The configuration file is discovered in the input root's ancestry and may
//! be written in YAML or JSON (`.skiffrc`, `.skiffrc.yml`, `.skiffrc.yaml`,
//! `.skiffrc.json`). Missing file means defaults. CLI flags override
//! configuration values; configuration overrides defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SkiffError};

/// File names probed during configuration discovery, in order
const CONFIG_FILE_NAMES: &[&str] = &[".skiffrc", ".skiffrc.yml", ".skiffrc.yaml", ".skiffrc.json"];

/// Custom template delimiters
///
/// Mirrors the template engine's syntax configuration; all six delimiters
/// must be set together when overriding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagDelimiters {
    pub variable_start: String,
    pub variable_end: String,
    pub block_start: String,
    pub block_end: String,
    pub comment_start: String,
    pub comment_end: String,
}

impl Default for TagDelimiters {
    fn default() -> Self {
        Self {
            variable_start: "{{".to_string(),
            variable_end: "}}".to_string(),
            block_start: "{%".to_string(),
            block_end: "%}".to_string(),
            comment_start: "{#".to_string(),
            comment_end: "#}".to_string(),
        }
    }
}

/// Template engine options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Custom tag delimiters; `None` keeps the engine defaults
    pub tags: Option<TagDelimiters>,
    /// Fail on undefined variables instead of rendering them empty
    pub strict_variables: bool,
}

/// Bundler options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    /// Fully dereference every pointer in the output
    pub dereference: bool,
    /// Dot path of the field removed when the version is excluded
    pub version_field: String,
    /// Keep the intermediate merged file after a successful run
    pub keep_intermediate: bool,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            dereference: false,
            version_field: "info.version".to_string(),
            keep_intermediate: false,
        }
    }
}

/// Fragment selection globs for the directory walker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Include patterns, wax glob syntax, matched against root-relative paths
    pub include: Vec<String>,
    /// Exclude patterns, applied after includes
    pub exclude: Vec<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            include: vec![
                "**/*.yml".to_string(),
                "**/*.yaml".to_string(),
                "**/*.json".to_string(),
            ],
            // Dotfiles are configuration and intermediates, not fragments
            exclude: vec![".*".to_string(), "**/.*".to_string()],
        }
    }
}

/// Path interpretation options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Allow `$ref` and mixin targets to escape the input root
    pub allow_outside_refs: bool,
}

/// Project-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub template: TemplateConfig,
    pub bundler: BundlerConfig,
    pub matching: MatchConfig,
    pub paths: PathsConfig,
}

impl ProjectConfig {
    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| crate::error::file_read_failed(path, e.to_string()))?;
        serde_yaml::from_str(&text).map_err(|e| SkiffError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Discover and load configuration starting from a directory
    ///
    /// Probes each ancestor of `start` for a configuration file; the nearest
    /// one wins. Returns defaults when none exists.
    pub fn discover(start: &Path) -> Result<Self> {
        for dir in start.ancestors() {
            for name in CONFIG_FILE_NAMES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Self::load(&candidate);
                }
            }
        }
        Ok(Self::default())
    }
}
