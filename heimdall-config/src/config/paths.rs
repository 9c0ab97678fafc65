//! Home-directory expansion for paths stored in documents.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Expand a leading `~` to the user's home directory.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the home directory cannot be determined
/// or the path uses `~user` syntax.
///
/// # Examples
///
/// ```
/// use heimdall_config::config::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde("~/Pictures/wall.jpg").unwrap();
/// assert!(expanded.ends_with("Pictures/wall.jpg"));
///
/// assert_eq!(expand_tilde("/absolute").unwrap(), Path::new("/absolute"));
/// ```
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if !path.starts_with('~') {
        return Ok(PathBuf::from(path));
    }

    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: PathBuf::from(path),
        reason: "cannot determine home directory".to_string(),
    })?;

    if path == "~" {
        Ok(home)
    } else if let Some(rest) = path.strip_prefix("~/") {
        Ok(home.join(rest))
    } else {
        Err(Error::InvalidPath {
            path: PathBuf::from(path),
            reason: "~user syntax is not supported; use ~ or ~/path".to_string(),
        })
    }
}

/// True if `path` (after `~` expansion) names an existing file system entry.
///
/// Paths that cannot be expanded count as missing.
#[must_use]
pub fn path_exists(path: &str) -> bool {
    expand_tilde(path).is_ok_and(|p| Path::new(&p).exists())
}
