//! Error types for the autoscience CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for autoscience operations.
///
/// Each variant maps to a specific exit code so the orchestrator can tell
/// validation faults, missing tooling and timeouts apart.
#[derive(Error, Debug)]
pub enum AutoscienceError {
    /// Filesystem, configuration, or other user-facing failure.
    #[error("{0}")]
    UserError(String),

    /// The project name was empty after normalization.
    #[error("invalid project name '{0}': must be non-empty after normalization")]
    InvalidName(String),

    /// A phase token outside the fixed pipeline sequence.
    #[error("invalid pipeline phase '{token}'. Must be one of: {expected}")]
    InvalidPhase { token: String, expected: String },

    /// The project is not ready for the requested operation.
    #[error("{0}")]
    Validation(String),

    /// The external agent command could not be found.
    #[error(
        "agent command '{0}' not found.\nFix: install it or ensure it is on your PATH."
    )]
    AgentNotFound(String),

    /// The agent run exceeded its wall-clock limit.
    #[error("agent run timed out after {0} seconds")]
    Timeout(u64),
}

impl AutoscienceError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            AutoscienceError::UserError(_) => exit_codes::USER_ERROR,
            AutoscienceError::InvalidName(_)
            | AutoscienceError::InvalidPhase { .. }
            | AutoscienceError::Validation(_) => exit_codes::VALIDATION_FAILURE,
            AutoscienceError::AgentNotFound(_) => exit_codes::AGENT_NOT_FOUND,
            AutoscienceError::Timeout(_) => exit_codes::TIMEOUT,
        }
    }
}

/// Result type alias for autoscience operations.
pub type Result<T> = std::result::Result<T, AutoscienceError>;
