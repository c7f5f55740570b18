//! Build command implementation
//!
//! The build process:
//! 1. Discover project configuration from the input path's ancestry
//! 2. Collect template variables from --variable flags
//! 3. Run the pipeline: walk, render, merge, validate, bundle, write
//! 4. Report the artifact path

use std::collections::BTreeMap;

use console::style;

use crate::cli::BuildArgs;
use crate::config::ProjectConfig;
use crate::context::RenderContext;
use crate::error::{Result, SkiffError};
use crate::pipeline::{self, PipelineOptions};
use crate::progress::ProgressDisplay;

/// Run build command
pub fn run(args: BuildArgs) -> Result<()> {
    let config = ProjectConfig::discover(&args.input)?;
    let variables = parse_variables(&args.variables)?;
    let context = RenderContext::new(variables);

    let options = PipelineOptions {
        input: args.input,
        output: args.output,
        indentation: args.indentation,
        dereference: args.dereference,
        skip_validation: args.skip_validation,
        exclude_version: args.exclude_version,
        single_file_output: args.one_file_output,
        strip_values: args.strip_values,
        strict_variables: args.strict_variables.then_some(true),
    };

    let progress = ProgressDisplay::new(0);
    let outcome = match pipeline::run(&options, &context, &config, &progress) {
        Ok(outcome) => outcome,
        Err(e) => {
            progress.abandon();
            return Err(e);
        }
    };

    if let Some(family) = outcome.family {
        println!(
            "{}",
            style(format!(
                "Validated {} fragment(s) as {}",
                outcome.fragments,
                family.name()
            ))
            .dim()
        );
    } else {
        println!(
            "{}",
            style(format!(
                "Assembled {} fragment(s); validation skipped",
                outcome.fragments
            ))
            .yellow()
        );
    }
    println!(
        "{}",
        style("Completed, the fragments were rendered, validated and bundled to:").green()
    );
    println!("{}", style(outcome.artifact.display()).green().bold());

    Ok(())
}

/// Parse repeated `key=value` variable flags
fn parse_variables(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut variables = BTreeMap::new();
    for entry in raw {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(SkiffError::ConfigInvalid {
                message: format!("invalid variable '{entry}': expected KEY=VALUE"),
            });
        };
        if key.is_empty() {
            return Err(SkiffError::ConfigInvalid {
                message: format!("invalid variable '{entry}': empty key"),
            });
        }
        variables.insert(key.to_string(), value.to_string());
    }
    Ok(variables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variables() {
        let vars = parse_variables(&["a=1".to_string(), "host=api.example.com".to_string()])
            .unwrap();
        assert_eq!(vars.get("a").map(String::as_str), Some("1"));
        assert_eq!(
            vars.get("host").map(String::as_str),
            Some("api.example.com")
        );
    }

    #[test]
    fn test_parse_variables_value_may_contain_equals() {
        let vars = parse_variables(&["query=a=b".to_string()]).unwrap();
        assert_eq!(vars.get("query").map(String::as_str), Some("a=b"));
    }

    #[test]
    fn test_parse_variables_rejects_missing_equals() {
        let err = parse_variables(&["oops".to_string()]).unwrap_err();
        assert!(matches!(err, SkiffError::ConfigInvalid { .. }));
    }

    #[test]
    fn test_parse_variables_rejects_empty_key() {
        let err = parse_variables(&["=value".to_string()]).unwrap_err();
        assert!(matches!(err, SkiffError::ConfigInvalid { .. }));
    }
}
