//! Error types for the heimdall-config library.
//!
//! This module provides the error hierarchy for schema extraction,
//! validation and migration, using `thiserror` for ergonomic error handling.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a heimdall-config error.
///
/// # Examples
///
/// ```
/// use heimdall_config::{Error, Result};
///
/// fn example_operation() -> Result<String> {
///     Ok("1.0.0".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the heimdall-config library.
#[derive(Debug, Error)]
pub enum Error {
    /// A declaration source file could not be parsed.
    #[error("parse error in {}: {source}", path.display())]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// The underlying parse failure.
        #[source]
        source: ParseError,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document could not be read or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A JSON value did not have the shape of a configuration document.
    #[error("invalid configuration document: {reason}")]
    InvalidDocument {
        /// Why the document was rejected.
        reason: String,
    },

    /// A required file does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// The missing file.
        path: PathBuf,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// The existing destination could not be moved aside.
    #[error("failed to back up {}: {source}", path.display())]
    BackupFailed {
        /// The destination that should have been backed up.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the new document failed after any backup was taken.
    #[error("failed to write {}{}: {source}", path.display(), backup_note(.backup.as_ref()))]
    WriteFailed {
        /// The destination that could not be written.
        path: PathBuf,
        /// Backup of the previous destination, left in place.
        backup: Option<PathBuf>,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No backup exists for the given destination.
    #[error("no backup found for {}", path.display())]
    NoBackup {
        /// The destination whose backups were searched.
        path: PathBuf,
    },

    /// The user declined to overwrite an existing destination.
    #[error("operation cancelled: {} was left untouched", path.display())]
    Cancelled {
        /// The destination that was not overwritten.
        path: PathBuf,
    },
}

fn backup_note(backup: Option<&PathBuf>) -> String {
    backup
        .map(|b| format!(" (previous file kept at {})", b.display()))
        .unwrap_or_default()
}

/// A failure while extracting declarations from legacy source text.
///
/// # Examples
///
/// ```
/// use heimdall_config::error::{ParseError, ParseErrorKind};
///
/// let err = ParseError::new(ParseErrorKind::UnterminatedBlock, 3);
/// assert_eq!(err.line, 3);
/// assert!(err.to_string().contains("line 3"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// The kind of failure.
    pub kind: ParseErrorKind,
    /// One-based line where the failure was detected.
    pub line: usize,
}

impl ParseError {
    /// Creates a new parse error at the given line.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, line: usize) -> Self {
        Self { kind, line }
    }
}

/// The kinds of failure the declaration extractor reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `{` was never closed.
    UnterminatedBlock,
    /// A `}` appeared with no open block.
    UnexpectedClose,
    /// Object blocks are nested deeper than the extractor accepts.
    NestingTooDeep {
        /// The maximum accepted depth.
        limit: usize,
    },
    /// A property name was declared twice in the same scope (strict mode only).
    DuplicateDeclaration {
        /// The repeated property name.
        name: String,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedBlock => write!(f, "unterminated block (missing '}}')"),
            Self::UnexpectedClose => write!(f, "unexpected '}}' with no open block"),
            Self::NestingTooDeep { limit } => {
                write!(f, "object blocks nested deeper than {limit} levels")
            }
            Self::DuplicateDeclaration { name } => {
                write!(f, "property '{name}' is declared more than once")
            }
        }
    }
}

impl Error {
    /// Check if error indicates a missing file.
    ///
    /// # Examples
    ///
    /// ```
    /// use heimdall_config::Error;
    /// use std::path::PathBuf;
    ///
    /// let err = Error::FileNotFound { path: PathBuf::from("/nonexistent") };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::FileNotFound { .. } => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// Check if error is an explicit user cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
