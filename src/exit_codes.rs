//! Exit code constants for the autoscience CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, IO failure, invalid config)
//! - 2: Validation failure (bad project name, bad phase, project not ready)
//! - 3: Agent command not found
//! - 4: Agent run timed out

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, filesystem faults, or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Validation failure: invalid project name or phase, missing research question or data.
pub const VALIDATION_FAILURE: i32 = 2;

/// The external agent binary could not be launched.
pub const AGENT_NOT_FOUND: i32 = 3;

/// The agent run exceeded its wall-clock limit and was killed.
pub const TIMEOUT: i32 = 4;
