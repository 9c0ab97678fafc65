//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `schema`: Generate the schema from legacy declaration files
//! - `validate`: Validate a configuration file
//! - `migrate`: Migrate to the current configuration format
//! - `restore`: Restore a configuration file from backup
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod migrate;
pub mod restore;
pub mod schema;
pub mod validate;

pub use completions::CompletionsCommand;
pub use migrate::MigrateCommand;
pub use restore::RestoreCommand;
pub use schema::SchemaCommand;
pub use validate::ValidateCommand;
