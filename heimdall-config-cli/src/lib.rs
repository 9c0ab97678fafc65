//! Library exports for heimdall-config-cli.
//!
//! This module exports the CLI structure so integration tests and the
//! completions command can build the clap command tree.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

// Re-export CLI for tooling
pub use cli::Cli;
