//! Atomic file writes.
//!
//! Every write of project state (phase record, research question, env file)
//! goes through here so a crash never leaves a half-written file behind:
//!
//! 1. Write content to `.{filename}.tmp` in the same directory
//! 2. fsync the temporary file
//! 3. Rename it over the target
//!
//! The temporary file takes the target's current permissions before any
//! content is written, so a replaced file keeps its mode.
//!
//! `std::fs::rename` replaces an existing destination on both POSIX and
//! Windows. Source and destination share a directory, so they always share a
//! filesystem.

use crate::error::{AutoscienceError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories as needed.
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    write_with_mode(path.as_ref(), content, None)
}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Like [`atomic_write_file`], but a newly created file is readable by the
/// owner only (mode 0600 on unix). An existing file keeps its mode.
pub fn atomic_write_private<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    write_with_mode(path.as_ref(), content.as_bytes(), Some(0o600))
}

fn write_with_mode(path: &Path, content: &[u8], new_file_mode: Option<u32>) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).map_err(|e| {
            AutoscienceError::UserError(format!(
                "failed to create parent directory '{}': {}",
                parent.display(),
                e
            ))
        })?;
    }

    let permissions = match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => new_file_mode.and_then(mode_permissions),
    };

    let temp_path = temp_path_for(path)?;
    write_and_sync(&temp_path, content, permissions)?;
    replace(&temp_path, path)
}

#[cfg(unix)]
fn mode_permissions(mode: u32) -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn mode_permissions(_mode: u32) -> Option<fs::Permissions> {
    None
}

fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            AutoscienceError::UserError(format!("invalid file path '{}'", target.display()))
        })?;

    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8], permissions: Option<fs::Permissions>) -> Result<()> {
    let mut file = File::create(path).map_err(|e| {
        AutoscienceError::UserError(format!(
            "failed to create temporary file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let written = permissions
        .map_or(Ok(()), |perms| file.set_permissions(perms))
        .and_then(|()| file.write_all(content))
        .and_then(|()| file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(path);
        return Err(AutoscienceError::UserError(format!(
            "failed to write temporary file '{}': {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

fn replace(source: &Path, target: &Path) -> Result<()> {
    fs::rename(source, target).map_err(|e| {
        let _ = fs::remove_file(source);
        AutoscienceError::UserError(format!(
            "failed to atomically replace '{}': {}",
            target.display(),
            e
        ))
    })?;

    // Persist the directory entry too; failure here is not fatal.
    #[cfg(unix)]
    if let Some(parent) = target.parent()
        && let Ok(dir) = File::open(parent)
    {
        let _ = dir.sync_all();
    }

    Ok(())
}
