//! Command implementations
//!
//! Each CLI subcommand has a `run` function here; the command layer collects
//! configuration and variables, then hands everything to the core pipeline.

pub mod build;
pub mod completions;
pub mod version;
