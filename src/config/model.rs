//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Config file looked up in the current directory when `--config` is not given.
pub const CONFIG_FILE: &str = "autoscience.yaml";

/// Configuration for autoscience.
///
/// This struct represents the contents of `autoscience.yaml`. Relative paths
/// are resolved against the current working directory. Unknown fields in the
/// YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one subdirectory per project.
    #[serde(default = "default_projects_root")]
    pub projects_root: PathBuf,

    /// Directory with the agent instruction fragments.
    #[serde(default = "default_agents_dir")]
    pub agents_dir: PathBuf,

    /// Key-value env file for the API key.
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,

    #[serde(default)]
    pub agent: AgentSettings,

    #[serde(default)]
    pub scripts: ScriptSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            projects_root: default_projects_root(),
            agents_dir: default_agents_dir(),
            env_file: default_env_file(),
            agent: AgentSettings::default(),
            scripts: ScriptSettings::default(),
        }
    }
}
