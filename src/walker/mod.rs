//! Fragment discovery
//!
//! Walks the input root and produces the fragment files to assemble, in a
//! deterministic order: depth-first, entries sorted lexicographically by
//! file name within every directory. The order is defined once and never
//! varies at runtime; merge results depend on it (sequences concatenate in
//! walker order).

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::config::MatchConfig;
use crate::error::{self, Result, SkiffError};

/// A discovered fragment file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Path relative to the input root, used for mount-point derivation
    pub relative_path: PathBuf,
}

/// Enumerates fragment files under an input root
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl Walker {
    pub fn new(root: impl AsRef<Path>, matching: &MatchConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            include: matching.include.clone(),
            exclude: matching.exclude.clone(),
        }
    }

    /// Enumerate fragments in deterministic order
    ///
    /// A missing root fails fast. A root that is a single file yields exactly
    /// that file. Symlinks are followed; loops are rejected.
    pub fn walk(&self) -> Result<Vec<Fragment>> {
        let metadata = std::fs::metadata(&self.root)
            .map_err(|_| error::input_not_found(&self.root))?;

        if metadata.is_file() {
            let name = self
                .root
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| self.root.clone());
            return Ok(vec![Fragment {
                absolute_path: absolute(&self.root),
                relative_path: name,
            }]);
        }

        let include = compile_globs(&self.include)?;
        let exclude = compile_globs(&self.exclude)?;

        let mut fragments = Vec::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for entry in WalkDir::new(&self.root).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(&self.root, &e))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path
                .strip_prefix(&self.root)
                .unwrap_or(path)
                .to_path_buf();
            let candidate_str = relative.to_string_lossy().replace('\\', "/");
            let candidate = CandidatePath::from(candidate_str.as_str());

            if !include.iter().any(|g| g.matched(&candidate).is_some()) {
                continue;
            }
            if exclude.iter().any(|g| g.matched(&candidate).is_some()) {
                continue;
            }

            // Two symlinked paths may alias the same file; visit each once
            let identity = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            if !seen.insert(identity) {
                continue;
            }

            fragments.push(Fragment {
                absolute_path: absolute(path),
                relative_path: relative,
            });
        }

        Ok(fragments)
    }
}

fn absolute(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Glob<'_>>> {
    patterns
        .iter()
        .map(|p| {
            Glob::new(p).map_err(|e| SkiffError::InvalidPattern {
                pattern: p.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

fn walk_error(root: &Path, err: &walkdir::Error) -> SkiffError {
    if let Some(ancestor) = err.loop_ancestor() {
        return error::symlink_loop(ancestor);
    }
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    error::walk_failed(&path, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn walk_all(root: &Path) -> Vec<String> {
        Walker::new(root, &MatchConfig::default())
            .walk()
            .unwrap()
            .into_iter()
            .map(|f| f.relative_path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_missing_root_fails_fast() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let err = Walker::new(&missing, &MatchConfig::default())
            .walk()
            .unwrap_err();
        assert!(matches!(err, SkiffError::InputNotFound { .. }));
    }

    #[test]
    fn test_single_file_root() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "api.yml", "openapi: 3.0.0\n");
        let fragments = Walker::new(temp.path().join("api.yml"), &MatchConfig::default())
            .walk()
            .unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].relative_path, PathBuf::from("api.yml"));
    }

    #[test]
    fn test_deterministic_lexicographic_order() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "index.yml", "");
        write(temp.path(), "paths/users/get.yml", "");
        write(temp.path(), "paths/users/post.yml", "");
        write(temp.path(), "components/schemas/user.yml", "");

        let first = walk_all(temp.path());
        let second = walk_all(temp.path());
        assert_eq!(first, second);
        assert_eq!(
            first,
            vec![
                "components/schemas/user.yml",
                "index.yml",
                "paths/users/get.yml",
                "paths/users/post.yml",
            ]
        );
    }

    #[test]
    fn test_include_patterns_filter() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "index.yml", "");
        write(temp.path(), "README.md", "# docs");
        write(temp.path(), "notes.txt", "");

        let fragments = walk_all(temp.path());
        assert_eq!(fragments, vec!["index.yml"]);
    }

    #[test]
    fn test_hidden_files_are_not_fragments() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "index.yml", "");
        write(temp.path(), ".skiffrc.yml", "bundler: {}\n");
        write(temp.path(), ".api.merged.yml", "leftover: true\n");

        let fragments = walk_all(temp.path());
        assert_eq!(fragments, vec!["index.yml"]);
    }

    #[test]
    fn test_exclude_patterns() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "index.yml", "");
        write(temp.path(), "drafts/wip.yml", "");

        let matching = MatchConfig {
            exclude: vec!["drafts/**".to_string()],
            ..MatchConfig::default()
        };
        let fragments = Walker::new(temp.path(), &matching).walk().unwrap();
        let names: Vec<String> = fragments
            .iter()
            .map(|f| f.relative_path.to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["index.yml"]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "index.yml", "");
        let matching = MatchConfig {
            include: vec!["[".to_string()],
            ..MatchConfig::default()
        };
        let err = Walker::new(temp.path(), &matching).walk().unwrap_err();
        assert!(matches!(err, SkiffError::InvalidPattern { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_is_rejected() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("specs");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.yml"), "").unwrap();
        std::os::unix::fs::symlink(temp.path(), dir.join("loop")).unwrap();

        let err = Walker::new(temp.path(), &MatchConfig::default())
            .walk()
            .unwrap_err();
        assert!(matches!(err, SkiffError::SymlinkCycle { .. }));
    }
}
