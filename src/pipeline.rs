//! Pipeline orchestration
//!
//! Runs the assembly stages in their fixed order: walk, render, parse,
//! merge, serialize, validate, resolve references, write. Each stage
//! consumes the previous stage's complete output; any fatal error aborts the
//! remaining stages and propagates to the caller.

use std::path::{Path, PathBuf};

use crate::bundle::writer::OutputWriter;
use crate::bundle::Bundler;
use crate::config::ProjectConfig;
use crate::context::RenderContext;
use crate::document::Node;
use crate::error::{self, Result};
use crate::merge::{Merger, OverridePolicy, ParsedFragment};
use crate::progress::ProgressDisplay;
use crate::render::Renderer;
use crate::serialize::{self, OutputFormat};
use crate::validate::{self, SpecFamily};
use crate::walker::Walker;

/// Inputs to one pipeline run, collected by the CLI layer
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Input root: a fragment directory or a single fragment file
    pub input: PathBuf,
    /// Output artifact path; extension selects the format
    pub output: PathBuf,
    /// Indentation width for the serialized output
    pub indentation: usize,
    /// Replace every pointer with its target in the output
    pub dereference: bool,
    /// Pass the document through unchecked (explicit escape hatch)
    pub skip_validation: bool,
    /// Remove the configured version field from the output
    pub exclude_version: bool,
    /// Keep the merged document in memory instead of writing the
    /// intermediate file
    pub single_file_output: bool,
    /// Override rules permitting merge replacement (dotted path patterns)
    pub strip_values: Vec<String>,
    /// Override the configured strict-variables mode
    pub strict_variables: Option<bool>,
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Absolute path of the intermediate merged file, when kept on disk
    pub intermediate: Option<PathBuf>,
    /// Absolute path of the final bundled artifact
    pub artifact: PathBuf,
    /// Detected specification family, `None` when validation was skipped
    pub family: Option<SpecFamily>,
    /// Number of fragments folded into the document
    pub fragments: usize,
}

/// Run the whole pipeline
pub fn run(
    options: &PipelineOptions,
    context: &RenderContext,
    config: &ProjectConfig,
    progress: &ProgressDisplay,
) -> Result<PipelineOutcome> {
    // Walk
    let fragments = Walker::new(&options.input, &config.matching).walk()?;
    let fragment_count = fragments.len();
    progress.set_total(fragment_count as u64);

    let root_dir = fragment_root(&options.input);

    // Render and parse
    let renderer = Renderer::new(
        &root_dir,
        context,
        &config.template,
        &config.paths,
        options.strict_variables,
    );
    let mut parsed = Vec::with_capacity(fragments.len());
    for fragment in &fragments {
        progress.update_fragment(&fragment.relative_path.to_string_lossy());
        let rendered = renderer.render_fragment(fragment)?;
        let node = Node::parse(&rendered)
            .map_err(|e| error::template::parse_failed(&fragment.absolute_path, e.to_string()))?;
        parsed.push(ParsedFragment {
            absolute_path: fragment.absolute_path.clone(),
            relative_path: fragment.relative_path.clone(),
            node,
        });
    }
    progress.finish();

    // Merge
    let policy = OverridePolicy::new(options.strip_values.clone())?;
    let merged = Merger::new(policy).merge(parsed)?;

    // Serialize the intermediate document; re-parsing it feeds the
    // validator exactly what a reader of the file would see
    let (document, intermediate) = if options.single_file_output {
        (merged.root, None)
    } else {
        let path = intermediate_path(&options.output);
        let format = OutputFormat::from_path(&path);
        let text = serialize::to_string(&merged.root, format, options.indentation)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| error::file_write_failed(parent, e.to_string()))?;
            }
        }
        std::fs::write(&path, &text)
            .map_err(|e| error::file_write_failed(&path, e.to_string()))?;
        let document = Node::parse(&text)
            .map_err(|e| error::template::parse_failed(&path, e.to_string()))?;
        (document, Some(path))
    };

    // Validate
    let family = if options.skip_validation {
        None
    } else {
        Some(validate::validate(&document)?)
    };

    // Resolve references
    let bundler = Bundler::new(&root_dir, config.paths.allow_outside_refs);
    let bundled = if options.dereference || config.bundler.dereference {
        bundler.dereference(&document)?
    } else {
        bundler.bundle(&document)?
    };

    // Write
    let writer = OutputWriter {
        indentation: options.indentation,
        exclude_version: options.exclude_version,
        version_field: config.bundler.version_field.clone(),
    };
    let artifact = writer.write(&bundled, &options.output)?;

    let intermediate = match intermediate {
        Some(path) if config.bundler.keep_intermediate => {
            Some(dunce::canonicalize(&path).unwrap_or(path))
        }
        Some(path) => {
            // Graceful cleanup; a leftover intermediate is not a failure
            let _ = std::fs::remove_file(&path);
            None
        }
        None => None,
    };

    Ok(PipelineOutcome {
        intermediate,
        artifact,
        family,
        fragments: fragment_count,
    })
}

/// Directory anchoring relative references and mixin targets
fn fragment_root(input: &Path) -> PathBuf {
    if input.is_file() {
        input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| input.to_path_buf())
    } else {
        input.to_path_buf()
    }
}

/// The intermediate merged file sits beside the output artifact
fn intermediate_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "out".to_string());
    let extension = OutputFormat::from_path(output).extension();
    let name = format!(".{stem}.merged.{extension}");
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(name),
        _ => PathBuf::from(name),
    }
}
