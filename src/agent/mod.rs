//! Research agent subsystem.
//!
//! - **Prompt**: workflow instruction composition
//! - **Invoke**: subprocess execution with timeout and sanitized output capture
//!
//! The agent is any CLI tool launched from a configurable command template,
//! so the workflow is not coupled to a specific vendor binary.

mod invoke;
pub mod prompt;

pub use invoke::{AgentOutput, agent_login_active, invoke_agent};
