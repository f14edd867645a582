//! Config loading, validation, and utility operations.

use super::model::{CONFIG_FILE, Config};
use crate::error::{AutoscienceError, Result};
use std::path::Path;
use tracing::debug;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            AutoscienceError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load the config for this invocation.
    ///
    /// An explicit path must exist. Without one, `autoscience.yaml` in the
    /// current directory is used if present, otherwise defaults apply.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::load(path);
        }

        let default_path = Path::new(CONFIG_FILE);
        if default_path.is_file() {
            debug!(path = %default_path.display(), "loading config");
            Self::load(default_path)
        } else {
            debug!("no config file found; using defaults");
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                AutoscienceError::UserError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `agent.command` must parse with shell-words and reference `{prompt}`
    /// - `agent.timeout_seconds` must be positive
    /// - `scripts.interpreter` must be non-empty
    /// - `scripts.timeout_seconds`, when set, must be positive
    /// - `scripts.pattern` must be a valid glob
    pub fn validate(&self) -> Result<()> {
        let args = shell_words::split(&self.agent.command).map_err(|e| {
            invalid(format!(
                "agent.command '{}' could not be parsed: {}",
                self.agent.command, e
            ))
        })?;
        if args.is_empty() {
            return Err(invalid("agent.command must not be empty".to_string()));
        }
        if !args.iter().skip(1).any(|arg| arg.contains("{prompt}")) {
            return Err(invalid(format!(
                "agent.command '{}' must pass the instruction via a {{prompt}} argument",
                self.agent.command
            )));
        }

        if self.agent.timeout_seconds == 0 {
            return Err(invalid(
                "agent.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        if self.scripts.interpreter.trim().is_empty() {
            return Err(invalid("scripts.interpreter must not be empty".to_string()));
        }

        if self.scripts.timeout_seconds == Some(0) {
            return Err(invalid(
                "scripts.timeout_seconds must be greater than 0 (use null for no limit)"
                    .to_string(),
            ));
        }

        globset::Glob::new(&self.scripts.pattern).map_err(|e| {
            invalid(format!(
                "scripts.pattern '{}' is not a valid glob: {}",
                self.scripts.pattern, e
            ))
        })?;

        Ok(())
    }
}

fn invalid(message: String) -> AutoscienceError {
    AutoscienceError::UserError(format!("config validation failed: {}", message))
}
