//! Execution of generated analysis and visualization scripts.
//!
//! Running a script never fails from the caller's point of view: a missing
//! file, a launch error or a timeout all come back as a [`RunResult`] with
//! exit code `-1` and an explanatory stderr, so a batch run always reports
//! every script.

use crate::config::ScriptSettings;
use crate::error::{AutoscienceError, Result};
use crate::process::{CaptureOptions, run_captured};
use globset::Glob;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::debug;

/// Exit code reported when a script could not run to completion.
pub const FAILED_TO_RUN: i32 = -1;

/// Outcome of running one script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub script_path: PathBuf,
    pub returncode: i32,
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl RunResult {
    fn completed(script_path: PathBuf, returncode: i32, stdout: String, stderr: String) -> Self {
        Self {
            script_path,
            returncode,
            stdout,
            stderr,
            success: returncode == 0,
        }
    }

    fn failed(script_path: PathBuf, message: String) -> Self {
        Self {
            script_path,
            returncode: FAILED_TO_RUN,
            stdout: String::new(),
            stderr: message,
            success: false,
        }
    }

    /// Multi-line report for an agent or a user.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Script: {}", self.script_path.display()),
            format!("Return code: {}", self.returncode),
            format!("Success: {}", self.success),
        ];
        if !self.stdout.is_empty() {
            lines.push("STDOUT:".to_string());
            lines.push(self.stdout.clone());
        }
        if !self.stderr.is_empty() {
            lines.push("STDERR:".to_string());
            lines.push(self.stderr.clone());
        }
        lines.join("\n")
    }
}

/// Runs scripts belonging to one project.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    project_path: PathBuf,
    interpreter: String,
    timeout_seconds: Option<u64>,
}

impl ScriptRunner {
    pub fn from_settings(project_path: impl Into<PathBuf>, settings: &ScriptSettings) -> Self {
        Self {
            project_path: project_path.into(),
            interpreter: settings.interpreter.clone(),
            timeout_seconds: settings.timeout_seconds,
        }
    }

    /// Run one script from its own directory.
    ///
    /// Relative paths resolve against the project directory.
    pub fn run_script(&self, script: &Path) -> RunResult {
        self.run_script_in(script, None)
    }

    /// Run one script from `cwd` (relative to the project), or from the
    /// script's directory when `cwd` is `None`.
    pub fn run_script_in(&self, script: &Path, cwd: Option<&Path>) -> RunResult {
        let path = self.resolve(script);
        if !path.exists() {
            return RunResult::failed(path.clone(), format!("Script not found: {}", path.display()));
        }

        let cwd = match cwd {
            Some(dir) => self.resolve(dir),
            None => path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| self.project_path.clone()),
        };

        let mut command = Command::new(&self.interpreter);
        command.arg(&path).current_dir(&cwd);

        let options = CaptureOptions {
            timeout: self.timeout_seconds.map(Duration::from_secs),
            echo: false,
            sanitize: false,
        };

        debug!(script = %path.display(), interpreter = %self.interpreter, "running script");
        match run_captured(&mut command, &options) {
            Ok(out) if out.timed_out => RunResult::failed(
                path,
                format!(
                    "Script timed out after {} seconds",
                    self.timeout_seconds.unwrap_or_default()
                ),
            ),
            Ok(out) => RunResult::completed(
                path,
                out.exit_code.unwrap_or(FAILED_TO_RUN),
                out.stdout,
                out.stderr,
            ),
            Err(e) => RunResult::failed(
                path,
                format!("failed to run '{}': {}", self.interpreter, e),
            ),
        }
    }

    /// Run every file in `folder` (relative to the project) whose name
    /// matches `pattern`, in lexicographic filename order.
    ///
    /// A missing folder yields no results. An invalid pattern or an
    /// unreadable folder is an error.
    pub fn run_scripts_in_folder(&self, folder: &str, pattern: &str) -> Result<Vec<RunResult>> {
        let matcher = Glob::new(pattern)
            .map_err(|e| {
                AutoscienceError::UserError(format!("invalid script pattern '{}': {}", pattern, e))
            })?
            .compile_matcher();

        let dir = self.project_path.join(folder);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AutoscienceError::UserError(format!(
                    "failed to read script folder '{}': {}",
                    dir.display(),
                    e
                )));
            }
        };

        let mut scripts: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.file_name().is_some_and(|name| matcher.is_match(name)))
            .collect();
        scripts.sort();

        Ok(scripts.iter().map(|script| self.run_script(script)).collect())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_path.join(path)
        }
    }
}
