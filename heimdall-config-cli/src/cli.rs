//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, MigrateCommand, RestoreCommand, SchemaCommand, ValidateCommand,
};
use clap::{Parser, Subcommand};

/// Generate, validate and migrate Heimdall shell configuration.
#[derive(Parser)]
#[command(name = "heimdall-config")]
#[command(
    version,
    about = "Generate, validate and migrate Heimdall shell configuration",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Generate the configuration schema from legacy declaration files
    Schema(SchemaCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Migrate legacy or earlier configuration to the current format
    Migrate(MigrateCommand),

    /// Restore a configuration file from its newest backup
    ///
    /// The backup is moved into place and the replaced file is kept as
    /// `<name>.json.replaced.<timestamp>`. Running restore again steps one
    /// backup further back.
    Restore(RestoreCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
