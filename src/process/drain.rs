//! Line-by-line pipe draining on a dedicated thread.
//!
//! Each drain thread owns its pipe and sends every line over its own channel;
//! the parent owns the accumulated buffer. Nothing is shared, so nothing is
//! locked, and lines received before a deadline survive even if the pipe
//! never closes.

use super::sanitize::clean_output;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;

/// Where a drained line is echoed, if anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Echo {
    Stdout,
    Stderr,
}

/// Start draining `pipe`; lines arrive on the returned receiver.
pub(super) fn spawn_drain<R>(pipe: R, echo: Option<Echo>, sanitize: bool) -> Receiver<String>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let mut reader = BufReader::new(pipe);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let raw = String::from_utf8_lossy(&buf);
                    let line = if sanitize {
                        clean_output(&raw)
                    } else {
                        raw.into_owned()
                    };
                    if let Some(target) = echo {
                        echo_line(target, &line);
                    }
                    // A gone receiver means the parent stopped listening; keep
                    // reading anyway so the child never blocks on a full pipe.
                    let _ = tx.send(line);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
    });

    rx
}

/// Collect lines until the sender hangs up or `deadline` passes.
pub(super) fn collect_until(rx: &Receiver<String>, deadline: Instant) -> String {
    let mut out = String::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(line) => out.push_str(&line),
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                // take whatever already arrived, then give up
                out.extend(rx.try_iter());
                break;
            }
        }
    }
    out
}

fn echo_line(target: Echo, line: &str) {
    if line.is_empty() {
        return;
    }
    let newline = if line.ends_with('\n') { "" } else { "\n" };
    let _ = match target {
        Echo::Stdout => {
            let mut out = io::stdout().lock();
            write!(out, "{}{}", line, newline).and_then(|()| out.flush())
        }
        Echo::Stderr => {
            let mut err = io::stderr().lock();
            write!(err, "{}{}", line, newline).and_then(|()| err.flush())
        }
    };
}
