//! Project name normalization.

use crate::error::{AutoscienceError, Result};
use std::path::{Path, PathBuf};

/// Normalize a raw project name into a single safe path component.
///
/// Surrounding whitespace is trimmed, `/` and `\` become `_`, then leading
/// and trailing dots are stripped. Replacing separators before stripping dots
/// means `../x` becomes `_x`-style names rather than a traversal.
pub fn normalize_name(raw: &str) -> Result<String> {
    let normalized: String = raw
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let normalized = normalized.trim_matches('.');

    if normalized.is_empty() {
        return Err(AutoscienceError::InvalidName(raw.to_string()));
    }

    Ok(normalized.to_string())
}

/// Absolute path of the project named `raw` under `projects_root`.
///
/// Pure apart from resolving a relative root against the current directory;
/// nothing is created.
pub fn path_for(raw: &str, projects_root: &Path) -> Result<PathBuf> {
    let name = normalize_name(raw)?;
    Ok(absolute_root(projects_root)?.join(name))
}

pub(super) fn absolute_root(projects_root: &Path) -> Result<PathBuf> {
    std::path::absolute(projects_root).map_err(|e| {
        AutoscienceError::UserError(format!(
            "failed to resolve projects root '{}': {}",
            projects_root.display(),
            e
        ))
    })
}
