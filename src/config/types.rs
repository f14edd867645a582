//! Nested config sections and their serde defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// How the external agent is launched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Command template, split with shell-words. Each argument may use
    /// `{prompt}` and `{project_path}`; `{prompt}` is required.
    #[serde(default = "default_agent_command")]
    pub command: String,

    /// Wall-clock limit for one agent run.
    #[serde(default = "default_agent_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Echo sanitized agent output while it runs.
    #[serde(default = "default_true")]
    pub stream: bool,

    /// Extra environment variables for the agent process.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            command: default_agent_command(),
            timeout_seconds: default_agent_timeout_seconds(),
            stream: default_true(),
            environment: BTreeMap::new(),
        }
    }
}

impl AgentSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// How generated scripts are executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptSettings {
    /// Interpreter used to run each script.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    /// Per-script limit in seconds; `null` disables the limit.
    #[serde(default = "default_script_timeout_seconds")]
    pub timeout_seconds: Option<u64>,

    /// Glob selecting scripts in a folder for batch runs.
    #[serde(default = "default_script_pattern")]
    pub pattern: String,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            timeout_seconds: default_script_timeout_seconds(),
            pattern: default_script_pattern(),
        }
    }
}

// Default value functions for serde
pub(crate) fn default_projects_root() -> PathBuf {
    PathBuf::from("projects")
}
pub(crate) fn default_agents_dir() -> PathBuf {
    PathBuf::from("agents")
}
pub(crate) fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}
pub(crate) fn default_agent_command() -> String {
    "codex exec --skip-git-repo-check {prompt}".to_string()
}
pub(crate) fn default_agent_timeout_seconds() -> u64 {
    1800
}
pub(crate) fn default_interpreter() -> String {
    "python3".to_string()
}
pub(crate) fn default_script_timeout_seconds() -> Option<u64> {
    Some(300)
}
pub(crate) fn default_script_pattern() -> String {
    "*.py".to_string()
}
pub(crate) fn default_true() -> bool {
    true
}
