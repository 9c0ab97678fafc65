//! Loading and saving documents, with backup-before-overwrite.
//!
//! Saving never deletes an existing destination: it is renamed to
//! `<stem>.json.backup.<YYYYMMDD-HHMMSS>` first, then the new document is
//! written. The rename-then-write sequence is not atomic; if the write fails
//! the backup is left where it is and reported in the error.
//!
//! Restoring moves the newest backup back into place, so each restore steps
//! one backup further into the past.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use super::document::ConfigDocument;
use crate::error::{Error, Result};

/// Marker between the stem and the timestamp of a backup file name.
pub const BACKUP_MARKER: &str = ".json.backup.";

/// Marker for a file set aside by a restore. These are never restore
/// candidates, so repeated restores keep stepping back through the backups.
pub const REPLACED_MARKER: &str = ".json.replaced.";

const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Reads and parses a document.
///
/// # Errors
///
/// Returns [`Error::FileNotFound`] if the file does not exist, [`Error::Io`]
/// if it cannot be read, [`Error::Json`] for malformed JSON, and
/// [`Error::InvalidDocument`] if the top level is not an object.
pub fn load_document(path: &Path) -> Result<ConfigDocument> {
    let text = fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Io(e)
        }
    })?;
    text.parse()
}

/// Writes a document, first moving any existing file aside.
///
/// Returns the backup path if a previous file was moved. Missing parent
/// directories are created.
///
/// # Errors
///
/// Returns [`Error::BackupFailed`] if the existing file cannot be renamed
/// (nothing is written in that case) and [`Error::WriteFailed`] if the new
/// document cannot be written (the backup, if any, is kept).
pub fn save_document(path: &Path, document: &ConfigDocument) -> Result<Option<PathBuf>> {
    save_with(path, document, write_file)
}

/// Creates missing parents and writes `text` to `path`.
fn write_file(path: &Path, text: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}

/// Backup-then-write with the write step supplied by the caller.
fn save_with<W>(path: &Path, document: &ConfigDocument, write: W) -> Result<Option<PathBuf>>
where
    W: FnOnce(&Path, &str) -> io::Result<()>,
{
    let text = document.to_pretty_string()?;

    let backup = if path.exists() {
        let backup = next_backup_path(path);
        fs::rename(path, &backup).map_err(|source| Error::BackupFailed {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Backed up existing configuration to: {}", backup.display());
        Some(backup)
    } else {
        None
    };

    write(path, &text).map_err(|source| Error::WriteFailed {
        path: path.to_path_buf(),
        backup: backup.clone(),
        source,
    })?;

    log::debug!("wrote {}", path.display());
    Ok(backup)
}

/// The backup name a save of `path` would use now.
///
/// Collisions with existing backups (two saves within one second) get a
/// `-N` suffix.
#[must_use]
pub fn next_backup_path(path: &Path) -> PathBuf {
    next_stamped_path(path, BACKUP_MARKER)
}

fn next_stamped_path(path: &Path, marker: &str) -> PathBuf {
    let stamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    let base = stamped_prefix(path, marker);

    let first = PathBuf::from(format!("{}{stamp}", base.display()));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| PathBuf::from(format!("{}{stamp}-{n}", base.display())))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

/// `<dir>/<stem><marker>`
fn stamped_prefix(path: &Path, marker: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{marker}"))
}

/// Sort key of a backup suffix: `(timestamp, collision counter)`.
fn backup_key(suffix: &str) -> Option<(String, u32)> {
    let stamp = suffix.get(..15)?;
    let counter = match suffix.get(15..)? {
        "" => 0,
        rest => rest.strip_prefix('-')?.parse().ok()?,
    };
    chrono::NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;
    Some((stamp.to_string(), counter))
}

/// Lists the backups of `path`, oldest first.
///
/// # Errors
///
/// Returns [`Error::Io`] if the containing directory cannot be read.
pub fn list_backups(path: &Path) -> Result<Vec<PathBuf>> {
    let prefix = stamped_prefix(path, BACKUP_MARKER);
    let Some(prefix_name) = prefix.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return Ok(Vec::new());
    };
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("."),
    };
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(key) = name.strip_prefix(&prefix_name).and_then(backup_key) {
            backups.push((key, entry.path()));
        }
    }
    backups.sort();
    Ok(backups.into_iter().map(|(_, path)| path).collect())
}

/// What a restore did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    /// The backup that was moved back into place.
    pub restored_from: PathBuf,
    /// Where the file being replaced was set aside, if it existed.
    pub previous_backup: Option<PathBuf>,
}

/// Moves the newest backup of `path` back to `path`.
///
/// The backup is consumed, so the next restore steps one backup further
/// back. A file already at `path` is renamed to
/// `<stem>.json.replaced.<YYYYMMDD-HHMMSS>`, which [`list_backups`] does not
/// report.
///
/// # Errors
///
/// Returns [`Error::NoBackup`] if there is no backup, a load error if the
/// backup is not a valid document (nothing is moved in that case),
/// [`Error::BackupFailed`] if the current file cannot be set aside and
/// [`Error::WriteFailed`] if the backup cannot be moved into place.
pub fn restore_latest_backup(path: &Path) -> Result<RestoreOutcome> {
    let latest = list_backups(path)?
        .pop()
        .ok_or_else(|| Error::NoBackup {
            path: path.to_path_buf(),
        })?;
    load_document(&latest)?;

    let previous_backup = if path.exists() {
        let replaced = next_stamped_path(path, REPLACED_MARKER);
        fs::rename(path, &replaced).map_err(|source| Error::BackupFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Some(replaced)
    } else {
        None
    };

    fs::rename(&latest, path).map_err(|source| Error::WriteFailed {
        path: path.to_path_buf(),
        backup: previous_backup.clone(),
        source,
    })?;
    log::info!("Restored {} from {}", path.display(), latest.display());

    Ok(RestoreOutcome {
        restored_from: latest,
        previous_backup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn doc(value: serde_json::Value) -> ConfigDocument {
        ConfigDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_document(Path::new("/nonexistent/shell.json")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_document(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_save_new_file_has_no_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/shell.json");
        let backup = save_document(&path, &doc(json!({"version": "1.0.0"}))).unwrap();
        assert!(backup.is_none());
        assert!(path.exists());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.json");
        let original = doc(json!({"version": "1.0.0", "bar": {"height": 30, "tags": [1, 2]}}));
        save_document(&path, &original).unwrap();
        assert_eq!(load_document(&path).unwrap(), original);
    }

    #[test]
    fn test_save_moves_existing_file_aside() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.json");
        fs::write(&path, "old contents").unwrap();

        let backup = save_document(&path, &doc(json!({"version": "1.0.0"})))
            .unwrap()
            .unwrap();

        assert_eq!(fs::read_to_string(&backup).unwrap(), "old contents");
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("shell.json.backup."));
    }

    #[test]
    fn test_failed_write_keeps_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.json");
        fs::write(&path, r#"{"version": "0.9.0"}"#).unwrap();

        // A directory appearing at the destination after the rename makes
        // the real write fail.
        let err = save_with(&path, &doc(json!({"version": "1.0.0"})), |path, text| {
            fs::create_dir(path)?;
            write_file(path, text)
        })
        .unwrap_err();

        let backup = match err {
            Error::WriteFailed {
                backup: Some(backup),
                ..
            } => backup,
            other => panic!("expected WriteFailed with a backup, got {other:?}"),
        };
        assert_eq!(
            fs::read_to_string(&backup).unwrap(),
            r#"{"version": "0.9.0"}"#
        );
        assert_eq!(list_backups(&path).unwrap(), vec![backup]);
        assert!(path.is_dir());
    }

    #[test]
    fn test_failed_write_without_previous_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.json");

        let err = save_with(&path, &doc(json!({"version": "1.0.0"})), |_, _| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        })
        .unwrap_err();

        assert!(matches!(err, Error::WriteFailed { backup: None, .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_backup_collisions_get_suffix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.json");
        let document = doc(json!({"version": "1.0.0"}));

        save_document(&path, &document).unwrap();
        let first = save_document(&path, &document).unwrap().unwrap();
        let second = save_document(&path, &document).unwrap().unwrap();
        let third = save_document(&path, &document).unwrap().unwrap();

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_eq!(list_backups(&path).unwrap().len(), 3);
    }

    #[test]
    fn test_list_backups_sorted_oldest_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.json");
        for name in [
            "shell.json.backup.20240102-000000",
            "shell.json.backup.20240101-000000-10",
            "shell.json.backup.20240101-000000",
            "shell.json.backup.20240101-000000-2",
            "shell.json.backup.garbage",
            "other.json.backup.20240101-000000",
        ] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let names: Vec<String> = list_backups(&path)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "shell.json.backup.20240101-000000",
                "shell.json.backup.20240101-000000-2",
                "shell.json.backup.20240101-000000-10",
                "shell.json.backup.20240102-000000",
            ]
        );
    }

    #[test]
    fn test_restore_latest_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.json");
        fs::write(
            dir.path().join("shell.json.backup.20240101-000000"),
            r#"{"version": "0.9.0"}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("shell.json.backup.20240102-000000"),
            r#"{"version": "1.0.0", "bar": {"height": 42}}"#,
        )
        .unwrap();
        fs::write(&path, r#"{"version": "1.0.0", "bar": {"height": 1}}"#).unwrap();

        let outcome = restore_latest_backup(&path).unwrap();

        assert!(outcome
            .restored_from
            .ends_with("shell.json.backup.20240102-000000"));
        let previous = outcome.previous_backup.unwrap();
        assert!(fs::read_to_string(previous).unwrap().contains("\"height\": 1"));
        assert_eq!(
            load_document(&path).unwrap().get_path("bar.height"),
            Some(&json!(42))
        );
    }

    #[test]
    fn test_repeated_restores_step_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.json");
        fs::write(
            dir.path().join("shell.json.backup.20240101-000000"),
            r#"{"version": "1.0.0", "bar": {"height": 10}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("shell.json.backup.20240102-000000"),
            r#"{"version": "1.0.0", "bar": {"height": 20}}"#,
        )
        .unwrap();
        fs::write(&path, r#"{"version": "1.0.0", "bar": {"height": 30}}"#).unwrap();

        restore_latest_backup(&path).unwrap();
        assert_eq!(
            load_document(&path).unwrap().get_path("bar.height"),
            Some(&json!(20))
        );
        assert_eq!(list_backups(&path).unwrap().len(), 1);

        let second = restore_latest_backup(&path).unwrap();
        assert!(second
            .restored_from
            .ends_with("shell.json.backup.20240101-000000"));
        assert_eq!(
            load_document(&path).unwrap().get_path("bar.height"),
            Some(&json!(10))
        );
        assert!(fs::read_to_string(second.previous_backup.unwrap())
            .unwrap()
            .contains("\"height\": 20"));

        assert!(matches!(
            restore_latest_backup(&path),
            Err(Error::NoBackup { .. })
        ));
    }

    #[test]
    fn test_restore_invalid_backup_moves_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shell.json");
        let backup = dir.path().join("shell.json.backup.20240101-000000");
        fs::write(&backup, "not json").unwrap();
        fs::write(&path, r#"{"version": "1.0.0"}"#).unwrap();

        assert!(matches!(restore_latest_backup(&path), Err(Error::Json(_))));
        assert!(backup.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"version": "1.0.0"}"#);
    }

    #[test]
    fn test_restore_without_backup() {
        let dir = tempdir().unwrap();
        let err = restore_latest_backup(&dir.path().join("shell.json")).unwrap_err();
        assert!(matches!(err, Error::NoBackup { .. }));
    }
}
