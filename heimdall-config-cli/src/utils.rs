//! Utility functions for CLI operations.
//!
//! This module provides path resolution and output helpers shared across
//! CLI commands.

use crate::error::CliError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Copy)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,
}

/// Resolve a user-supplied path, expanding a leading `~`.
///
/// Shells expand `~` on the command line, but not in values taken from
/// environment variables, so every path flag goes through here.
pub fn resolve_path(path: &Path) -> Result<PathBuf, CliError> {
    let Some(text) = path.to_str() else {
        return Ok(path.to_path_buf());
    };
    heimdall_config::config::expand_tilde(text).map_err(CliError::from)
}

/// Resolve an optional path flag.
pub fn resolve_optional(path: Option<&Path>) -> Result<Option<PathBuf>, CliError> {
    path.map(resolve_path).transpose()
}

/// Write `contents` to `path`, or to stdout when no path is given.
///
/// Parent directories of `path` are created as needed.
pub fn write_output(path: Option<&Path>, contents: &str) -> Result<(), CliError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, contents)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
