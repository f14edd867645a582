//! Filesystem utilities for autoscience.
//!
//! Atomic writes keep state files whole across crashes; idempotent removal
//! backs the "reset generated artifacts" operation.

pub mod atomic;
mod remove;

pub use atomic::{atomic_write_file, atomic_write_private};
pub use remove::{clear_dir_contents, remove_file_if_exists};
