//! Main entry point for the heimdall-config CLI.
//!
//! It provides commands for managing the shell configuration:
//! - `schema`: Generate the JSON schema (and TypeScript definitions)
//! - `validate`: Validate a configuration file
//! - `migrate`: Migrate legacy or earlier configuration
//! - `restore`: Roll a configuration file back to its newest backup
//! - `completions`: Generate shell completion scripts

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _level = heimdall_config::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Schema(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Migrate(cmd) => cmd.execute(&global),
        cli::Command::Restore(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
