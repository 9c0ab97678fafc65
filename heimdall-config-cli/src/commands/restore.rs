//! Command to restore a configuration file from its newest backup.

use crate::error::CliError;
use crate::utils::{resolve_path, shorten_path, GlobalOptions};
use clap::Args;
use heimdall_config::config::{list_backups, restore_latest_backup};
use std::path::PathBuf;

/// Restore a configuration file from its newest backup.
#[derive(Args)]
pub struct RestoreCommand {
    /// Configuration file to restore
    #[arg(value_name = "CONFIG", env = "HEIMDALL_CONFIG_FILE")]
    pub config: PathBuf,

    /// List the available backups, oldest first, instead of restoring
    #[arg(long)]
    pub list: bool,
}

impl RestoreCommand {
    /// Execute the restore command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = resolve_path(&self.config)?;

        if self.list {
            for backup in list_backups(&config)? {
                println!("{}", backup.display());
            }
            return Ok(());
        }

        let outcome = restore_latest_backup(&config)?;

        if global.quiet {
            println!("{}", outcome.restored_from.display());
        } else {
            eprintln!("Restore complete:");
            eprintln!("  Restored: {}", shorten_path(&config));
            eprintln!("  From:     {}", shorten_path(&outcome.restored_from));
            if let Some(previous) = &outcome.previous_backup {
                eprintln!("  Previous file kept at: {}", shorten_path(previous));
            }
        }

        Ok(())
    }
}
