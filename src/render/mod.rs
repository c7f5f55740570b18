//! Template rendering
//!
//! Renders a fragment's templating directives (variable interpolation,
//! conditionals, loops, template functions) against the immutable
//! [`RenderContext`](crate::context::RenderContext). Rendering has no side
//! effects beyond returning text; nothing is written to disk at this stage.
//!
//! The `mixin()` function lets one fragment splice another fragment's
//! rendered content in place; inclusion is tracked through a render stack so
//! a fragment that directly or transitively includes itself fails with a
//! cycle error instead of recursing forever.

mod mixin;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use minijinja::syntax::SyntaxConfig;
use minijinja::value::{Kwargs, Rest, Value};
use minijinja::{Environment, ErrorKind, State, UndefinedBehavior};

use crate::config::{PathsConfig, TagDelimiters, TemplateConfig};
use crate::context::functions::{auto_tag, fragment_stem, unique_operation_id};
use crate::context::{BuiltinFunction, RenderContext};
use crate::error::{self, Result, SkiffError};
use crate::walker::Fragment;

/// Renders fragments against a fixed context
pub struct Renderer {
    state: Arc<RenderState>,
}

/// Shared state for a render pass
///
/// The inclusion stack is the only mutable piece; it tracks the chain of
/// fragments currently being rendered for cycle detection.
pub(crate) struct RenderState {
    pub(crate) root: PathBuf,
    pub(crate) variables: BTreeMap<String, String>,
    pub(crate) functions: Vec<BuiltinFunction>,
    pub(crate) tags: Option<TagDelimiters>,
    pub(crate) strict: bool,
    pub(crate) allow_outside: bool,
    pub(crate) stack: Mutex<Vec<PathBuf>>,
}

impl Renderer {
    pub fn new(
        root: &Path,
        context: &RenderContext,
        template: &TemplateConfig,
        paths: &PathsConfig,
        strict_override: Option<bool>,
    ) -> Self {
        let root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        let state = RenderState {
            root,
            variables: context.variables().clone(),
            functions: context.functions().iter().copied().collect(),
            tags: template.tags.clone(),
            strict: strict_override.unwrap_or(template.strict_variables),
            allow_outside: paths.allow_outside_refs,
            stack: Mutex::new(Vec::new()),
        };
        Self {
            state: Arc::new(state),
        }
    }

    /// Render one fragment's raw text to its final textual form
    pub fn render_fragment(&self, fragment: &Fragment) -> Result<String> {
        let source = std::fs::read_to_string(&fragment.absolute_path)
            .map_err(|e| error::file_read_failed(&fragment.absolute_path, e.to_string()))?;
        render_source(
            &self.state,
            &fragment.absolute_path,
            &fragment.relative_path,
            &source,
            &[],
        )
    }
}

/// Pops the inclusion stack when a render scope ends, on every exit path
struct StackGuard<'a>(&'a RenderState);

impl Drop for StackGuard<'_> {
    fn drop(&mut self) {
        let mut stack = self
            .0
            .stack
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        stack.pop();
    }
}

/// Render template source for the fragment at `path`
///
/// `mixin_args` binds `var1..varN` inside included fragments.
pub(crate) fn render_source(
    state: &Arc<RenderState>,
    path: &Path,
    relative: &Path,
    source: &str,
    mixin_args: &[Value],
) -> Result<String> {
    {
        let mut stack = state
            .stack
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if stack.iter().any(|p| p == path) {
            return Err(error::inclusion_cycle(&stack, path));
        }
        stack.push(path.to_path_buf());
    }
    let _guard = StackGuard(state);

    let env = build_environment(state)?;
    let ctx = build_render_values(state, path, relative, mixin_args);
    env.render_str(source, ctx)
        .map_err(|e| unwrap_engine_error(path, &e))
}

/// Template context: user variables, per-fragment reserved values, mixin args
fn build_render_values(
    state: &RenderState,
    path: &Path,
    relative: &Path,
    mixin_args: &[Value],
) -> BTreeMap<String, Value> {
    let mut values: BTreeMap<String, Value> = state
        .variables
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(v.clone())))
        .collect();

    values.insert(
        "__fragment_path".to_string(),
        Value::from(path.display().to_string()),
    );
    values.insert(
        "__fragment_stem".to_string(),
        Value::from(fragment_stem(relative)),
    );
    values.insert(
        "__fragment_op_id".to_string(),
        Value::from(unique_operation_id(relative)),
    );
    values.insert(
        "__fragment_tag".to_string(),
        Value::from(auto_tag(relative)),
    );

    for (i, arg) in mixin_args.iter().enumerate() {
        values.insert(format!("var{}", i + 1), arg.clone());
    }

    values
}

fn build_environment(state: &Arc<RenderState>) -> Result<Environment<'static>> {
    let mut env = Environment::new();
    // Fragments are YAML; the final newline is significant
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(if state.strict {
        UndefinedBehavior::Strict
    } else {
        UndefinedBehavior::Lenient
    });

    if let Some(tags) = &state.tags {
        let syntax = SyntaxConfig::builder()
            .block_delimiters(tags.block_start.clone(), tags.block_end.clone())
            .variable_delimiters(tags.variable_start.clone(), tags.variable_end.clone())
            .comment_delimiters(tags.comment_start.clone(), tags.comment_end.clone())
            .build()
            .map_err(|e| SkiffError::ConfigInvalid {
                message: format!("invalid template delimiters: {e}"),
            })?;
        env.set_syntax(syntax);
    }

    for function in &state.functions {
        install_function(&mut env, *function, state);
    }

    Ok(env)
}

fn install_function(
    env: &mut Environment<'static>,
    function: BuiltinFunction,
    state: &Arc<RenderState>,
) {
    match function {
        BuiltinFunction::FileName => {
            env.add_function("file_name", |mj: &State| reserved(mj, "__fragment_stem"));
        }
        BuiltinFunction::UniqueOpId => {
            env.add_function("unique_op_id", |mj: &State| {
                reserved(mj, "__fragment_op_id")
            });
        }
        BuiltinFunction::AutoTag => {
            env.add_function("auto_tag", |mj: &State| reserved(mj, "__fragment_tag"));
        }
        BuiltinFunction::Mixin => {
            let shared = Arc::clone(state);
            env.add_function(
                "mixin",
                move |mj: &State,
                      target: String,
                      args: Rest<Value>,
                      options: Kwargs|
                      -> std::result::Result<String, minijinja::Error> {
                    let indent: Option<usize> = options.get("indent")?;
                    options.assert_all_used()?;
                    let current = mj
                        .lookup("__fragment_path")
                        .and_then(|v| v.as_str().map(PathBuf::from));
                    mixin::render_mixin(&shared, current.as_deref(), &target, &args.0, indent)
                        .map_err(into_engine_error)
                },
            );
        }
    }
}

fn reserved(mj: &State, key: &str) -> Value {
    mj.lookup(key).unwrap_or_else(|| Value::from(""))
}

/// Tunnel a pipeline error through the engine so its type survives
fn into_engine_error(err: SkiffError) -> minijinja::Error {
    minijinja::Error::new(ErrorKind::InvalidOperation, "mixin failed").with_source(err)
}

/// Map an engine error back to a pipeline error
///
/// Errors raised by the mixin function travel through the engine as error
/// sources; recover them so cycle and missing-target failures keep their
/// kind. Everything else is a template error on the current fragment.
fn unwrap_engine_error(path: &Path, err: &minijinja::Error) -> SkiffError {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(skiff) = inner.downcast_ref::<SkiffError>() {
            return skiff.clone();
        }
        source = inner.source();
    }
    if matches!(err.kind(), ErrorKind::UndefinedError) {
        error::undefined_variable(path, err)
    } else {
        error::template_render_failed(path, err)
    }
}
