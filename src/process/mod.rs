//! Child process execution with captured output and a wall-clock limit.
//!
//! Both the agent adapter and the script runner go through [`run_captured`]:
//!
//! - stdout and stderr are drained concurrently, one thread each, so a chatty
//!   child never blocks on a full pipe
//! - the parent polls the child until it exits or the timeout passes, then
//!   kills it
//! - drain threads get a bounded grace period to finish; output that has not
//!   arrived by then is dropped

mod drain;
mod sanitize;

pub use sanitize::clean_output;

use drain::{Echo, collect_until, spawn_drain};
use std::io;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// How long to poll between `try_wait` calls.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Drain grace period after the child exits on its own.
const GRACE_AFTER_EXIT: Duration = Duration::from_secs(5);

/// Drain grace period after the child was killed.
const GRACE_AFTER_KILL: Duration = Duration::from_secs(2);

/// Options for [`run_captured`].
#[derive(Debug, Clone, Default)]
pub struct CaptureOptions {
    /// Kill the child after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Echo lines live (stdout to stdout, stderr to stderr) while capturing.
    pub echo: bool,
    /// Strip terminal control sequences from captured text.
    pub sanitize: bool,
}

/// Outcome of a captured child process.
#[derive(Debug, Clone)]
pub struct CapturedOutput {
    /// Exit code, or `None` if killed or terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Whether the child was killed for exceeding the timeout.
    pub timed_out: bool,
    pub duration: Duration,
}

impl CapturedOutput {
    pub fn is_success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }
}

/// Spawn `command` with piped output and wait for it under `options`.
///
/// Spawn failures are returned as-is so callers can tell a missing binary
/// (`ErrorKind::NotFound`) from other faults.
pub fn run_captured(command: &mut Command, options: &CaptureOptions) -> io::Result<CapturedOutput> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let start = Instant::now();
    let mut child = command.spawn()?;

    let stdout_rx = child.stdout.take().map(|pipe| {
        spawn_drain(pipe, options.echo.then_some(Echo::Stdout), options.sanitize)
    });
    let stderr_rx = child.stderr.take().map(|pipe| {
        spawn_drain(pipe, options.echo.then_some(Echo::Stderr), options.sanitize)
    });

    let (exit_code, timed_out) = wait_with_timeout(&mut child, options.timeout)?;

    let grace = if timed_out {
        GRACE_AFTER_KILL
    } else {
        GRACE_AFTER_EXIT
    };
    let deadline = Instant::now() + grace;
    let mut stdout = stdout_rx
        .map(|rx| collect_until(&rx, deadline))
        .unwrap_or_default();
    let mut stderr = stderr_rx
        .map(|rx| collect_until(&rx, deadline))
        .unwrap_or_default();

    if options.sanitize {
        stdout = clean_output(&stdout);
        stderr = clean_output(&stderr);
    }

    Ok(CapturedOutput {
        exit_code,
        stdout,
        stderr,
        timed_out,
        duration: start.elapsed(),
    })
}

/// Wait for a child process, killing it once `timeout` has passed.
///
/// Returns (exit_code, timed_out).
fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> io::Result<(Option<i32>, bool)> {
    let Some(timeout) = timeout else {
        let status = child.wait()?;
        return Ok((status.code(), false));
    };

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status.code(), false));
        }
        if start.elapsed() >= timeout {
            // SIGKILL on Unix, TerminateProcess on Windows
            let _ = child.kill();
            let _ = child.wait();
            return Ok((None, true));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
