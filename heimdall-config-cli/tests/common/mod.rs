//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - A command builder isolated from the caller's environment
//! - Legacy declaration fixtures

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables the CLI reads, cleared for every test command.
const ISOLATED_VARS: &[&str] = &[
    "HEIMDALL_CONFIG_FILE",
    "HEIMDALL_LEGACY_DIR",
    "HEIMDALL_LOG_MODE",
];

/// Test environment with an isolated temporary directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            temp_path,
        }
    }

    /// Get a command builder for the binary with a clean environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("heimdall-config").expect("Failed to find binary");
        for var in ISOLATED_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(&self.temp_path);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Write a file relative to the temp directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Read a file relative to the temp directory.
    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.temp_path.join(name)).expect("Failed to read test file")
    }

    /// Parse a JSON file relative to the temp directory.
    pub fn read_json(&self, name: &str) -> serde_json::Value {
        serde_json::from_str(&self.read(name)).expect("Failed to parse JSON")
    }

    /// Names of the entries in the temp directory, sorted.
    pub fn entries(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.temp_path)
            .expect("Failed to read temp dir")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Create a `legacy/` declaration directory with bar and launcher modules.
    pub fn legacy_dir(&self) -> PathBuf {
        self.write(
            "legacy/BarConfig.qml",
            "QtObject {\n    property int height: 36\n    property string position: \"top\"\n}\n",
        );
        self.write(
            "legacy/LauncherConfig.qml",
            "QtObject {\n    // Maximum entries shown\n    property int maxShown: 8\n    property bool enabled: true\n}\n",
        );
        self.temp_path.join("legacy")
    }
}
