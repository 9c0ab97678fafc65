//! Migrate command implementation.
//!
//! This module implements the `migrate` command, which builds the current
//! configuration document from legacy declaration files or an earlier JSON
//! document and saves it with a backup of the previous file.

use crate::error::CliError;
use crate::utils::{resolve_optional, resolve_path, shorten_path, GlobalOptions};
use clap::Args;
use heimdall_config::migration::{MigrateOptions, MigrationOutcome, Migrator, OverwritePrompt};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Migrate legacy or earlier configuration to the current format.
#[derive(Args)]
pub struct MigrateCommand {
    /// Earlier JSON configuration to carry forward
    #[arg(long, short, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Directory holding the legacy declaration files
    #[arg(long, value_name = "DIR", env = "HEIMDALL_LEGACY_DIR")]
    pub legacy_dir: Option<PathBuf>,

    /// Where to write the migrated configuration
    #[arg(long, short, value_name = "FILE", env = "HEIMDALL_CONFIG_FILE")]
    pub output: PathBuf,

    /// File holding the path of the current wallpaper
    #[arg(long, value_name = "FILE")]
    pub wallpaper_state: Option<PathBuf>,

    /// Print the migrated configuration without writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Overwrite an existing output file without asking
    #[arg(long, short)]
    pub yes: bool,
}

impl MigrateCommand {
    /// Execute the migrate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let output = resolve_path(&self.output)?;
        if output.is_dir() {
            return Err(CliError::InvalidArguments(format!(
                "Output is a directory: {}",
                output.display()
            )));
        }

        // 1. Build migrate options
        let mut options = MigrateOptions::new(output)
            .with_dry_run(self.dry_run)
            .with_assume_yes(self.yes);
        if let Some(input) = resolve_optional(self.input.as_deref())? {
            options = options.with_input(input);
        }
        if let Some(dir) = resolve_optional(self.legacy_dir.as_deref())? {
            options = options.with_legacy_dir(dir);
        }
        if let Some(state) = resolve_optional(self.wallpaper_state.as_deref())? {
            options = options.with_wallpaper_state(state);
        }

        // 2. Run the migration
        let outcome = Migrator::new(options).run(&mut StdinPrompt)?;

        // 3. Report
        match outcome {
            MigrationOutcome::DryRun { document } => {
                print!("{}", document.to_pretty_string()?);
                if !global.quiet {
                    eprintln!("Dry run - no changes made.");
                }
            }
            MigrationOutcome::Completed { output, backup, .. } => {
                if global.quiet {
                    // Output the destination path to stdout for scripting
                    println!("{}", output.display());
                } else {
                    eprintln!("Migration complete:");
                    eprintln!("  Output: {}", shorten_path(&output));
                    if let Some(backup) = &backup {
                        eprintln!("  Backup: {}", shorten_path(backup));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Asks on stderr and reads the answer from stdin.
///
/// Anything other than `y` or `yes` (case-insensitive), including end of
/// input, declines.
struct StdinPrompt;

impl OverwritePrompt for StdinPrompt {
    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        eprint!("{} already exists. Overwrite? (y/N): ", shorten_path(path));
        let _ = io::stderr().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes("YES"));
        assert!(!is_yes(""));
        assert!(!is_yes("n\n"));
        assert!(!is_yes("yep"));
    }
}
