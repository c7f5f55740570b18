//! Cycle detection errors

use super::SkiffError;
use std::path::{Path, PathBuf};

/// Render a cycle chain as `a -> b -> a`
fn format_chain<I: IntoIterator<Item = String>>(chain: I) -> String {
    chain.into_iter().collect::<Vec<_>>().join(" -> ")
}

/// Creates a circular fragment inclusion error
///
/// The chain lists every fragment on the inclusion path, ending with the
/// fragment that closed the cycle.
pub fn inclusion(chain: &[PathBuf], repeated: &Path) -> SkiffError {
    let mut parts: Vec<String> = chain.iter().map(|p| p.display().to_string()).collect();
    parts.push(repeated.display().to_string());
    SkiffError::InclusionCycle {
        chain: format_chain(parts),
    }
}

/// Creates a circular reference resolution error
pub fn reference(chain: &[String], repeated: &str) -> SkiffError {
    let mut parts = chain.to_vec();
    parts.push(repeated.to_string());
    SkiffError::ReferenceCycle {
        chain: format_chain(parts),
    }
}

/// Creates a symlink loop error
pub fn symlink_loop(path: &Path) -> SkiffError {
    SkiffError::SymlinkCycle {
        path: path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusion_chain_shows_repeat() {
        let chain = vec![PathBuf::from("a.yml"), PathBuf::from("b.yml")];
        let err = inclusion(&chain, Path::new("a.yml"));
        assert_eq!(
            err.to_string(),
            "Circular fragment inclusion: a.yml -> b.yml -> a.yml"
        );
    }

    #[test]
    fn test_reference_chain() {
        let chain = vec!["#/a".to_string(), "#/b".to_string()];
        let err = reference(&chain, "#/a");
        assert!(err.to_string().contains("#/a -> #/b -> #/a"));
    }
}
