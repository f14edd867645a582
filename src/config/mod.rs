//! Configuration model for autoscience.
//!
//! This module defines the Config struct that represents `autoscience.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, and validation of config values.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

pub use model::{CONFIG_FILE, Config};
pub use types::{AgentSettings, ScriptSettings};
