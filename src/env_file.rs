//! Minimal `KEY=value` env file support.
//!
//! Values are never exported into this process; callers pass them to the
//! agent's environment instead.

use crate::error::{AutoscienceError, Result};
use crate::fs::atomic_write_private;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Variable holding the agent's API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Parsed contents of an env file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl EnvFile {
    /// Load `path`; a missing file yields no entries.
    pub fn load(path: &Path) -> Result<Self> {
        let entries = match fs::read_to_string(path) {
            Ok(content) => parse(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(AutoscienceError::UserError(format!(
                    "failed to read env file '{}': {}",
                    path.display(),
                    e
                )));
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Set `key` in the file on disk, replacing its existing line or
    /// appending one. Other lines are kept as written. A new file is
    /// created readable by the owner only; an existing file keeps its mode.
    pub fn save(&mut self, key: &str, value: &str) -> Result<()> {
        let existing = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(AutoscienceError::UserError(format!(
                    "failed to read env file '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let prefix = format!("{}=", key);
        let replacement = format!("{}{}", prefix, value);
        let mut replaced = false;
        let mut lines: Vec<String> = existing
            .lines()
            .map(|line| {
                if line.trim().starts_with(&prefix) {
                    replaced = true;
                    replacement.clone()
                } else {
                    line.to_string()
                }
            })
            .collect();
        if !replaced {
            lines.push(replacement);
        }

        atomic_write_private(&self.path, &format!("{}\n", lines.join("\n")))?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Parse `KEY=value` lines.
///
/// Blank lines, `#` comments and lines without `=` are skipped. Keys and
/// values are trimmed and surrounding quotes are stripped from values. A
/// later duplicate overrides an earlier one.
fn parse(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .filter_map(|(key, value)| {
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches(['\'', '"']);
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
