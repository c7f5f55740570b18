//! Skiff - API specification assembler
//!
//! A command line tool that assembles a single OpenAPI, Swagger or AsyncAPI
//! document from a tree of smaller, templated YAML/JSON fragments, then
//! validates and bundles it into one deliverable artifact.

use clap::Parser;

mod bundle;
mod cli;
mod commands;
mod config;
mod context;
mod document;
mod error;
mod merge;
mod pipeline;
mod progress;
mod render;
mod serialize;
mod validate;
mod walker;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build(args) => commands::build::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
