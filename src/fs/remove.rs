//! Idempotent deletion helpers.
//!
//! A path that is already gone counts as deleted. Any other failure
//! (permission denied, busy file, ...) is reported to the caller.

use crate::error::{AutoscienceError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Remove a file or symlink, treating "not found" as success.
///
/// Returns `true` if this call removed something.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(AutoscienceError::UserError(format!(
            "failed to remove '{}': {}",
            path.display(),
            e
        ))),
    }
}

/// Recursively remove a directory, treating "not found" as success.
pub fn remove_dir_all_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(AutoscienceError::UserError(format!(
            "failed to remove directory '{}': {}",
            path.display(),
            e
        ))),
    }
}

/// Delete every entry inside `dir`, keeping `dir` itself.
///
/// A missing `dir` is a no-op. Symlinks are unlinked, never followed.
/// Returns the number of top-level entries this call removed.
pub fn clear_dir_contents(dir: &Path) -> Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(AutoscienceError::UserError(format!(
                "failed to read directory '{}': {}",
                dir.display(),
                e
            )));
        }
    };

    let mut removed = 0;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(AutoscienceError::UserError(format!(
                    "failed to read directory '{}': {}",
                    dir.display(),
                    e
                )));
            }
        };

        let path = entry.path();
        // symlink_metadata so a link to a directory is unlinked, not traversed
        let file_type = match fs::symlink_metadata(&path) {
            Ok(meta) => meta.file_type(),
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(AutoscienceError::UserError(format!(
                    "failed to inspect '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        let gone = if file_type.is_dir() {
            remove_dir_all_if_exists(&path)?
        } else {
            remove_file_if_exists(&path)?
        };
        if gone {
            removed += 1;
        }
    }

    Ok(removed)
}
