//! CLI surface tests

mod common;

use common::{skiff, TestProject};
use predicates::prelude::*;

#[test]
fn test_help_shows_build_command() {
    skiff()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"));
}

#[test]
fn test_build_help_lists_flags() {
    skiff()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--dereference")
                .and(predicate::str::contains("--skip-validation"))
                .and(predicate::str::contains("--exclude-version"))
                .and(predicate::str::contains("--one-file-output")),
        );
}

#[test]
fn test_version_command() {
    skiff()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skiff"));
}

#[test]
fn test_completions_bash() {
    skiff()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skiff"));
}

#[test]
fn test_completions_unknown_shell() {
    skiff()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown shell"));
}

#[test]
fn test_invalid_variable_flag() {
    let project = TestProject::new();
    project.seed_minimal_openapi();

    skiff()
        .args([
            "build",
            "-i",
            &project.arg("src"),
            "-o",
            &project.arg("api.yml"),
            "-v",
            "not-a-pair",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

#[test]
fn test_invalid_strip_value_pattern() {
    let project = TestProject::new();
    project.seed_minimal_openapi();

    skiff()
        .args([
            "build",
            "-i",
            &project.arg("src"),
            "-o",
            &project.arg("api.yml"),
            "-s",
            "a.**.b",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only allowed as the final segment"));
}

#[test]
fn test_error_output_is_prefixed() {
    let project = TestProject::new();

    skiff()
        .args(["build", "-i", &project.arg("missing"), "-o", &project.arg("api.yml")])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}
