//! Migration of legacy or earlier configurations to the current document.
//!
//! A migration seeds a base document from built-in defaults, merges in
//! either the legacy declaration directory or a prior JSON document, repairs
//! the result with [`apply_fixups`], and saves it with a backup of whatever
//! was at the destination.
//!
//! # Examples
//!
//! Computing a migrated document without writing it:
//!
//! ```
//! use heimdall_config::migration::{AssumeYes, MigrateOptions, MigrationOutcome, Migrator};
//! use std::path::PathBuf;
//!
//! let options = MigrateOptions::new(PathBuf::from("/nonexistent/shell.json")).with_dry_run(true);
//! let outcome = Migrator::new(options).run(&mut AssumeYes).unwrap();
//!
//! assert!(matches!(outcome, MigrationOutcome::DryRun { .. }));
//! assert!(outcome.document().get_path("commands.terminal").is_some());
//! ```

mod defaults;
mod fixups;
mod migrator;
mod rules;

pub use defaults::{
    appearance_defaults, bar_defaults, base_document, default_commands, default_logout, timestamp,
    DEFAULT_WALLPAPER, USER_PLACEHOLDER,
};
pub use fixups::apply_fixups;
pub use migrator::{
    AssumeYes, MigrateOptions, MigrationOutcome, MigrationSource, Migrator, OverwritePrompt,
};
pub use rules::{apply_legacy_rules, LegacyMigration, MigrationRule, LEGACY_RULES};
