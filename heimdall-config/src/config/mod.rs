//! Configuration documents: loading, merging, validation and storage.
//!
//! A [`ConfigDocument`] is an ordered JSON mapping with a required `version`
//! and the sections listed in [`SECTIONS`]. This module provides:
//! - right-biased deep merge ([`ConfigMerger`])
//! - validation with accumulated findings ([`ConfigValidator`],
//!   [`ValidationReport`])
//! - load/save with backup-before-overwrite and restore ([`store`])
//!
//! # Examples
//!
//! Validating a document:
//!
//! ```
//! use heimdall_config::config::{ConfigDocument, ConfigValidator};
//!
//! let doc: ConfigDocument = r#"{"version": "2.0"}"#.parse().unwrap();
//! let report = ConfigValidator::new().validate(&doc);
//!
//! assert!(!report.is_valid());
//! assert_eq!(report.errors.len(), 1);
//! assert!(report.warnings.is_empty());
//! ```
//!
//! Saving with a backup of the previous file:
//!
//! ```no_run
//! use heimdall_config::config::{store, ConfigDocument};
//! use std::path::Path;
//!
//! let path = Path::new("/home/user/.config/quickshell/heimdall/shell.json");
//! let doc = store::load_document(path).unwrap();
//! if let Some(backup) = store::save_document(path, &doc).unwrap() {
//!     println!("previous file kept at {}", backup.display());
//! }
//! ```

mod document;
mod merger;
mod paths;
mod report;
pub mod store;
mod validator;

#[cfg(test)]
mod proptests;

pub use document::{is_valid_version, ConfigDocument, CURRENT_VERSION, SECTIONS, VERSION_PATTERN};
pub use merger::ConfigMerger;
pub use paths::{expand_tilde, path_exists};
pub use report::{Severity, ValidationIssue, ValidationReport};
pub use store::{list_backups, load_document, restore_latest_backup, save_document, RestoreOutcome};
pub use validator::{ConfigValidator, BAR_POSITIONS, WALLPAPER_MODES};
