//! Common test utilities for integration tests.
//!
//! Fixture builders for legacy declaration directories and configuration
//! documents.

use std::fs;
use std::path::{Path, PathBuf};

use heimdall_config::ConfigDocument;
use serde_json::Value;

/// Legacy bar declarations with a nested object and a doc comment.
pub const BAR_SOURCE: &str = r#"import QtQuick

QtObject {
    // Whether the bar is shown
    property bool enabled: true
    property int height: 36
    property string position: "top"
    property QtObject workspaces: QtObject {
        property int shown: 7
        property bool rounded: true
    }
}
"#;

/// Legacy launcher declarations.
pub const LAUNCHER_SOURCE: &str = r##"QtObject {
    property bool enabled: true
    property int maxShown: 8
    property color accent: "#cba6f7"
    property list<string> favourites: []
}
"##;

/// Legacy animation declarations, including a duration heuristic.
pub const ANIMATION_SOURCE: &str = r#"QtObject {
    property bool enabled: true
    property int durationNormal: 200
    property QtObject durations: QtObject {
        property int small: 100
    }
}
"#;

/// Writes `contents` to `dir/name` and returns the full path.
#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Creates a legacy declaration directory with bar, launcher and animation
/// modules, plus one file that fails to parse.
#[allow(dead_code)]
pub fn legacy_fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "BarConfig.qml", BAR_SOURCE);
    write_file(dir.path(), "LauncherConfig.qml", LAUNCHER_SOURCE);
    write_file(dir.path(), "AnimationConfig.qml", ANIMATION_SOURCE);
    write_file(dir.path(), "LockConfig.qml", "QtObject {\n    property int x: 1\n");
    dir
}

/// Builds a document from a JSON literal.
#[allow(dead_code)]
pub fn document(value: Value) -> ConfigDocument {
    ConfigDocument::from_value(value).unwrap()
}

/// Messages of a list of issues, for compact assertions.
#[allow(dead_code)]
pub fn messages(issues: &[heimdall_config::config::ValidationIssue]) -> Vec<String> {
    issues.iter().map(|issue| issue.message.clone()).collect()
}
