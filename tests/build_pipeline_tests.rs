//! End-to-end pipeline tests driving the compiled binary

mod common;

use common::{skiff, TestProject};
use predicates::prelude::*;

#[test]
fn test_flat_tree_merges_declared_paths() {
    let project = TestProject::new();
    project.seed_minimal_openapi();

    skiff()
        .args(["build", "-i", &project.arg("src"), "-o", &project.arg("build/api.yml")])
        .assert()
        .success()
        .stdout(predicate::str::contains("bundled to"));

    let output: serde_yaml::Value =
        serde_yaml::from_str(&project.read_file("build/api.yml")).unwrap();
    let paths = output.get("paths").and_then(|p| p.as_mapping()).unwrap();
    assert_eq!(paths.len(), 1);
    assert!(paths.contains_key(serde_yaml::Value::String("/users".into())));
}

#[test]
fn test_directory_derived_mounts() {
    let project = TestProject::new();
    project.write_file(
        "src/index.yml",
        "openapi: 3.0.0\ninfo:\n  title: Test Api\n  version: '1.0.0'\npaths: {}\n",
    );
    project.write_file(
        "src/paths/users/{id}/get.yml",
        "summary: Fetch one user\nresponses:\n  '200':\n    description: ok\n",
    );
    project.write_file(
        "src/components/schemas/user.yml",
        "type: object\nproperties:\n  id:\n    type: string\n",
    );

    skiff()
        .args(["build", "-i", &project.arg("src"), "-o", &project.arg("api.yml")])
        .assert()
        .success();

    let output: serde_yaml::Value =
        serde_yaml::from_str(&project.read_file("api.yml")).unwrap();
    let op = output
        .get("paths")
        .and_then(|p| p.get("/users/{id}"))
        .and_then(|p| p.get("get"))
        .unwrap();
    assert_eq!(
        op.get("summary").and_then(|s| s.as_str()),
        Some("Fetch one user")
    );
    assert!(output
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(|s| s.get("user"))
        .is_some());
}

#[test]
fn test_two_runs_produce_identical_output() {
    let project = TestProject::new();
    project.seed_minimal_openapi();
    project.write_file(
        "src/paths/teams/get.yml",
        "responses:\n  '200':\n    description: ok\n",
    );

    skiff()
        .args(["build", "-i", &project.arg("src"), "-o", &project.arg("a.yml")])
        .assert()
        .success();
    skiff()
        .args(["build", "-i", &project.arg("src"), "-o", &project.arg("b.yml")])
        .assert()
        .success();

    assert_eq!(project.read_file("a.yml"), project.read_file("b.yml"));
}

#[test]
fn test_exclude_version_on_both_runs() {
    let project = TestProject::new();
    project.seed_minimal_openapi();

    for _ in 0..2 {
        skiff()
            .args([
                "build",
                "-i",
                &project.arg("src"),
                "-o",
                &project.arg("api.yml"),
                "--exclude-version",
            ])
            .assert()
            .success();

        let output: serde_yaml::Value =
            serde_yaml::from_str(&project.read_file("api.yml")).unwrap();
        let info = output.get("info").and_then(|i| i.as_mapping()).unwrap();
        assert!(!info.contains_key(serde_yaml::Value::String("version".into())));
        assert!(info.contains_key(serde_yaml::Value::String("title".into())));
    }
}

#[test]
fn test_json_output_with_indentation() {
    let project = TestProject::new();
    project.seed_minimal_openapi();

    skiff()
        .args([
            "build",
            "-i",
            &project.arg("src"),
            "-o",
            &project.arg("api.json"),
            "--indentation",
            "4",
        ])
        .assert()
        .success();

    let text = project.read_file("api.json");
    serde_json::from_str::<serde_json::Value>(&text).unwrap();
    assert!(text.contains("\n    \"info\""));
}

#[test]
fn test_single_file_input() {
    let project = TestProject::new();
    project.write_file(
        "api-src.yml",
        "openapi: 3.0.0\ninfo:\n  title: One File\n  version: '1.0.0'\npaths: {}\n",
    );

    skiff()
        .args([
            "build",
            "-i",
            &project.arg("api-src.yml"),
            "-o",
            &project.arg("api.yml"),
        ])
        .assert()
        .success();

    assert!(project.file_exists("api.yml"));
}

#[test]
fn test_one_file_output_skips_intermediate() {
    let project = TestProject::new();
    project.seed_minimal_openapi();

    skiff()
        .args([
            "build",
            "-i",
            &project.arg("src"),
            "-o",
            &project.arg("build/api.yml"),
            "--one-file-output",
        ])
        .assert()
        .success();

    assert!(project.file_exists("build/api.yml"));
    assert!(!project.file_exists("build/.api.merged.yml"));
}

#[test]
fn test_keep_intermediate_via_config() {
    let project = TestProject::new();
    project.seed_minimal_openapi();
    project.write_file(".skiffrc.yml", "bundler:\n  keep_intermediate: true\n");

    skiff()
        .args(["build", "-i", &project.arg("src"), "-o", &project.arg("build/api.yml")])
        .assert()
        .success();

    assert!(project.file_exists("build/.api.merged.yml"));
}

#[test]
fn test_missing_input_fails_fast() {
    let project = TestProject::new();

    skiff()
        .args(["build", "-i", &project.arg("missing"), "-o", &project.arg("api.yml")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input path not found"));
}
