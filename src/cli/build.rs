//! Build command arguments

use clap::Args;
use std::path::PathBuf;

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Input fragment directory or single fragment file
    #[arg(long, short = 'i', env = "SKIFF_INPUT")]
    pub input: PathBuf,

    /// Output artifact path (.yml, .yaml or .json)
    #[arg(long, short = 'o', env = "SKIFF_OUTPUT")]
    pub output: PathBuf,

    /// Indentation width for the serialized output
    #[arg(long, short = 'I', default_value_t = 2)]
    pub indentation: usize,

    /// Replace every $ref pointer with the literal content of its target
    #[arg(long, short = 'd')]
    pub dereference: bool,

    /// Skip specification validation (the document passes through unchecked)
    #[arg(long)]
    pub skip_validation: bool,

    /// Remove the configured version field from the output document
    #[arg(long, short = 'x')]
    pub exclude_version: bool,

    /// Keep the merged document in memory; do not write an intermediate file
    #[arg(long, short = '1')]
    pub one_file_output: bool,

    /// Template variable as key=value (repeatable)
    #[arg(long = "variable", short = 'v', value_name = "KEY=VALUE")]
    pub variables: Vec<String>,

    /// Fail on undefined template variables
    #[arg(long)]
    pub strict_variables: bool,

    /// Merge override rule permitting replacement (repeatable, dotted path)
    #[arg(long = "strip-value", short = 's', value_name = "PATTERN")]
    pub strip_values: Vec<String>,
}
