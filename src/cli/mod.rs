//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - build: Build command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod build;
pub mod completions;

pub use build::BuildArgs;
pub use completions::CompletionsArgs;

/// Skiff - API specification assembler
///
/// Assemble OpenAPI, Swagger and AsyncAPI documents from templated fragment trees.
#[derive(Parser, Debug)]
#[command(
    name = "skiff",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Assemble OpenAPI, Swagger and AsyncAPI documents from templated fragment trees",
    long_about = "Skiff renders a tree of templated YAML/JSON fragments, merges them into a \
                  single document, validates it against its specification family and bundles \
                  it into one deliverable artifact.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  skiff build -i ./src -o ./build/api.yml        \x1b[90m# Assemble a fragment tree\x1b[0m\n   \
                  skiff build -i ./src -o ./build/api.json -d    \x1b[90m# Fully dereferenced JSON\x1b[0m\n   \
                  skiff build -i ./src -o api.yml -v env=prod    \x1b[90m# With template variables\x1b[0m\n   \
                  skiff build -i ./src -o api.yml -s info.title  \x1b[90m# Permit an override\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble a fragment tree into a bundled specification
    Build(BuildArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parsing_build() {
        let cli = Cli::try_parse_from(["skiff", "build", "-i", "./src", "-o", "api.yml"]).unwrap();
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.input, PathBuf::from("./src"));
                assert_eq!(args.output, PathBuf::from("api.yml"));
                assert_eq!(args.indentation, 2);
                assert!(!args.dereference);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_parsing_build_flags() {
        let cli = Cli::try_parse_from([
            "skiff",
            "build",
            "-i",
            "src",
            "-o",
            "api.json",
            "--dereference",
            "--skip-validation",
            "--exclude-version",
            "--one-file-output",
            "--strict-variables",
            "--indentation",
            "4",
        ])
        .unwrap();
        match cli.command {
            Commands::Build(args) => {
                assert!(args.dereference);
                assert!(args.skip_validation);
                assert!(args.exclude_version);
                assert!(args.one_file_output);
                assert!(args.strict_variables);
                assert_eq!(args.indentation, 4);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_parsing_variables_repeat() {
        let cli = Cli::try_parse_from([
            "skiff", "build", "-i", "src", "-o", "api.yml", "-v", "a=1", "-v", "b=2",
        ])
        .unwrap();
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.variables, vec!["a=1", "b=2"]);
            }
            _ => panic!("Expected Build command"),
        }
    }

    #[test]
    fn test_cli_parsing_missing_output_fails() {
        assert!(Cli::try_parse_from(["skiff", "build", "-i", "src"]).is_err());
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["skiff", "completions", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, "zsh"),
            _ => panic!("Expected Completions command"),
        }
    }
}
