//! Integration tests for the `validate` command.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_validate_valid_file() {
    let env = TestEnv::new();
    let config = env.write("shell.json", r#"{"version": "1.0.0"}"#);

    env.command()
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation PASSED"))
        .stdout(predicate::str::contains("Summary: 0 errors, 0 warnings"));
}

#[test]
fn test_validate_bad_version() {
    let env = TestEnv::new();
    let config = env.write("shell.json", r#"{"version": "2.0"}"#);

    env.command()
        .arg("validate")
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Validation FAILED"))
        .stdout(predicate::str::contains("Invalid version format: 2.0"))
        .stdout(predicate::str::contains("Summary: 1 errors, 0 warnings"))
        .stderr(predicate::str::contains("Configuration validation failed"));
}

#[test]
fn test_validate_reports_every_error() {
    let env = TestEnv::new();
    let config = env.write(
        "shell.json",
        r#"{"version": "1.0.0", "bar": {"height": -5, "position": "left"}}"#,
    );

    env.command()
        .arg("validate")
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("bar.height must be a positive number"))
        .stdout(predicate::str::contains(
            "bar.position must be 'top' or 'bottom', got 'left'",
        ));
}

#[test]
fn test_validate_applies_cross_field_rules() {
    let env = TestEnv::new();
    let config = env.write(
        "shell.json",
        r#"{"version": "1.0.0", "modules": {"servicesIntegration": {"weather": {"enabled": true}}}}"#,
    );

    env.command()
        .arg("validate")
        .arg(&config)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("apiKey"));
}

#[test]
fn test_validate_with_schema() {
    let env = TestEnv::new();
    let legacy = env.legacy_dir();
    let config = env.write(
        "shell.json",
        r#"{"version": "1.0.0", "modules": {"launcher": {"maxShown": "many"}}}"#,
    );

    env.command()
        .arg("validate")
        .arg(&config)
        .arg("--legacy-dir")
        .arg(&legacy)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "modules.launcher.maxShown must be of type integer, got string",
        ));
}

#[test]
fn test_validate_from_environment() {
    let env = TestEnv::new();
    let config = env.write("shell.json", r#"{"version": "1.0.0"}"#);

    env.command()
        .env("HEIMDALL_CONFIG_FILE", &config)
        .arg("validate")
        .assert()
        .success();
}

#[test]
fn test_validate_missing_file() {
    let env = TestEnv::new();

    env.command()
        .args(["validate", "missing.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn test_validate_invalid_json() {
    let env = TestEnv::new();
    let config = env.write("shell.json", "{ not json");

    env.command()
        .arg("validate")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JSON error"));
}
