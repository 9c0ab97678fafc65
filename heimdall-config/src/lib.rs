#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # heimdall-config
//!
//! Schema inference, validation and migration for the Heimdall shell
//! configuration.
//!
//! The shell used to keep its settings as `property` declarations spread over
//! many legacy source files. This library reads those declarations, infers a
//! JSON Schema from them, validates the single JSON configuration document
//! that replaced them, and migrates old setups into that document.
//!
//! ## Modules
//!
//! - [`schema`]: declaration extraction, type inference, schema assembly and
//!   rendering (JSON Schema, TypeScript)
//! - [`config`]: the configuration document, deep merge, validation and
//!   storage with backups
//! - [`migration`]: legacy and JSON migration with post-merge fix-ups
//! - [`error`] and [`logging`]: shared error and logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use heimdall_config::config::{ConfigDocument, ConfigValidator};
//! use serde_json::json;
//!
//! let doc = ConfigDocument::from_value(json!({
//!     "version": "1.0.0",
//!     "bar": {"height": -5, "position": "left"}
//! })).unwrap();
//!
//! let report = ConfigValidator::new().validate(&doc);
//! assert_eq!(report.errors.len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod migration;
pub mod schema;

// Re-export key types at crate root for convenience
pub use config::{ConfigDocument, ConfigMerger, ConfigValidator, ValidationReport};
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use migration::{MigrateOptions, MigrationOutcome, Migrator};
pub use schema::{AssembledSchema, CrossFieldRule, DeclarationExtractor, SchemaAssembler};
