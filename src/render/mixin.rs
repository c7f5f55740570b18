//! Fragment inclusion (`mixin`)
//!
//! `mixin(path, ...args, indent=N)` renders another fragment relative to the
//! current one and splices the result in place. Positional arguments bind to
//! `var1..varN` inside the included fragment; `indent` re-indents every line
//! after the first so the spliced block lines up with the call site.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use minijinja::value::Value;

use super::{render_source, RenderState};
use crate::error::{self, Result};

pub(crate) fn render_mixin(
    state: &Arc<RenderState>,
    current: Option<&Path>,
    target: &str,
    args: &[Value],
    indent: Option<usize>,
) -> Result<String> {
    let base = current
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| state.root.clone());
    let joined = base.join(target);

    let resolved = dunce::canonicalize(&joined).map_err(|_| {
        error::mixin_not_found(current.unwrap_or(state.root.as_path()), &joined)
    })?;

    if !state.allow_outside && !resolved.starts_with(&state.root) {
        return Err(error::template::mixin_outside_root(
            current.unwrap_or(state.root.as_path()),
            &resolved,
        ));
    }

    let source = std::fs::read_to_string(&resolved)
        .map_err(|e| error::file_read_failed(&resolved, e.to_string()))?;

    let relative = resolved
        .strip_prefix(&state.root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| resolved.clone());

    let rendered = render_source(state, &resolved, &relative, &source, args)?;
    Ok(apply_indent(rendered.trim_end(), indent.unwrap_or(0)))
}

/// Indent every line after the first by `width` spaces
fn apply_indent(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let pad = " ".repeat(width);
    let mut lines = text.lines();
    let mut out = String::new();
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        out.push('\n');
        if !line.is_empty() {
            out.push_str(&pad);
        }
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_indent_skips_first_line() {
        let out = apply_indent("name: MIT\nurl: https://mit.example", 2);
        assert_eq!(out, "name: MIT\n  url: https://mit.example");
    }

    #[test]
    fn test_apply_indent_zero_is_identity() {
        assert_eq!(apply_indent("a\nb", 0), "a\nb");
    }

    #[test]
    fn test_apply_indent_keeps_blank_lines_bare() {
        let out = apply_indent("a\n\nb", 4);
        assert_eq!(out, "a\n\n    b");
    }
}
