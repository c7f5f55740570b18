//! Common test utilities for Skiff integration tests

use std::path::PathBuf;

use tempfile::TempDir;

/// A test project for integration tests
#[allow(dead_code)]
pub struct TestProject {
    /// Temporary directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Path to project root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestProject {
    /// Create a new test project
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        let file_path = self.path.join(path);
        std::fs::read_to_string(&file_path).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Absolute path of a project-relative file as a string argument
    pub fn arg(&self, path: &str) -> String {
        self.path.join(path).to_string_lossy().to_string()
    }

    /// Seed a minimal valid OpenAPI fragment tree under `src/`
    pub fn seed_minimal_openapi(&self) {
        self.write_file(
            "src/index.yml",
            "openapi: 3.0.0\ninfo:\n  title: Test Api\n  version: '1.0.0'\npaths: {}\n",
        );
        self.write_file(
            "src/users.yml",
            "paths./users:\n  get:\n    responses:\n      '200':\n        description: ok\n",
        );
    }
}

/// A skiff command ready to run
#[allow(dead_code)]
pub fn skiff() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("skiff").expect("skiff binary")
}
