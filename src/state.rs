//! Pipeline phase tracking for a project.
//!
//! The phase is a single token in `pipeline_state.txt` at the project root.
//! Phases form a fixed linear sequence; the only mutation is advancing by one.
//!
//! ```text
//! Parsing Data -> Running Analysis -> Visualizing -> Reporting -> Done
//! ```
//!
//! A missing or blank record reads as the first phase. An unrecognized token
//! never fails a read: it is treated as the first phase, and `advance` reports
//! the first phase without touching the file.

use crate::error::{AutoscienceError, Result};
use crate::fs::atomic_write_file;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// File name of the phase record inside a project directory.
pub const STATE_FILE: &str = "pipeline_state.txt";

/// A pipeline phase. Declaration order is sequence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    ParsingData,
    RunningAnalysis,
    Visualizing,
    Reporting,
    Done,
}

impl Phase {
    /// Every phase, in sequence order.
    pub const ALL: [Phase; 5] = [
        Phase::ParsingData,
        Phase::RunningAnalysis,
        Phase::Visualizing,
        Phase::Reporting,
        Phase::Done,
    ];

    /// The phase a new (or reset) project starts in.
    pub const fn first() -> Phase {
        Phase::ParsingData
    }

    /// Exact on-disk token for this phase.
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::ParsingData => "Parsing Data",
            Phase::RunningAnalysis => "Running Analysis",
            Phase::Visualizing => "Visualizing",
            Phase::Reporting => "Reporting",
            Phase::Done => "Done",
        }
    }

    /// Zero-based position in the sequence.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// The following phase, or `None` for `Done`.
    pub fn next(self) -> Option<Phase> {
        Phase::ALL.get(self.ordinal() + 1).copied()
    }

    /// Look up a phase by its exact token.
    pub fn from_token(token: &str) -> Option<Phase> {
        Phase::ALL.into_iter().find(|p| p.as_str() == token)
    }

    fn expected_tokens() -> String {
        Phase::ALL
            .iter()
            .map(|p| format!("\"{}\"", p.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = AutoscienceError;

    fn from_str(s: &str) -> Result<Self> {
        Phase::from_token(s).ok_or_else(|| AutoscienceError::InvalidPhase {
            token: s.to_string(),
            expected: Phase::expected_tokens(),
        })
    }
}

/// Phase record for one project directory.
///
/// The store does not check that the project's subdirectories exist; it only
/// needs the directory that will hold the record.
#[derive(Debug, Clone)]
pub struct PipelineState {
    project_path: PathBuf,
}

impl PipelineState {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
        }
    }

    /// Path of the record file.
    pub fn path(&self) -> PathBuf {
        self.project_path.join(STATE_FILE)
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Current phase. Missing, blank, or unrecognized records read as the first phase.
    pub fn read(&self) -> Result<Phase> {
        let Some(token) = self.read_token()? else {
            return Ok(Phase::first());
        };

        match Phase::from_token(&token) {
            Some(phase) => Ok(phase),
            None => {
                warn!(
                    path = %self.path().display(),
                    token = %token,
                    "unrecognized pipeline phase; treating as first phase"
                );
                Ok(Phase::first())
            }
        }
    }

    /// Persist `phase` as the record, replacing the whole file.
    pub fn write(&self, phase: Phase) -> Result<()> {
        debug!(path = %self.path().display(), phase = %phase, "writing pipeline phase");
        atomic_write_file(self.path(), phase.as_str())
    }

    /// Persist a phase given as text. Fails with `InvalidPhase` for unknown tokens.
    pub fn write_token(&self, token: &str) -> Result<()> {
        let phase: Phase = token.parse()?;
        self.write(phase)
    }

    /// Advance one phase.
    ///
    /// - unrecognized record: returns the first phase, writes nothing
    /// - `Done`: returns `None`, writes nothing
    /// - otherwise: writes and returns the next phase
    pub fn advance(&self) -> Result<Option<Phase>> {
        let current = match self.read_token()? {
            None => Phase::first(),
            Some(token) => match Phase::from_token(&token) {
                Some(phase) => phase,
                None => {
                    warn!(
                        path = %self.path().display(),
                        token = %token,
                        "unrecognized pipeline phase; reporting first phase without writing"
                    );
                    return Ok(Some(Phase::first()));
                }
            },
        };

        let Some(next) = current.next() else {
            debug!(path = %self.path().display(), "pipeline already done");
            return Ok(None);
        };

        self.write(next)?;
        Ok(Some(next))
    }

    /// The stored token when it is not a known phase, `None` otherwise.
    pub fn unrecognized_token(&self) -> Result<Option<String>> {
        Ok(self
            .read_token()?
            .filter(|token| Phase::from_token(token).is_none()))
    }

    /// Raw trimmed token, or `None` when the record is missing or blank.
    fn read_token(&self) -> Result<Option<String>> {
        let path = self.path();
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let token = content.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_string()))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AutoscienceError::UserError(format!(
                "failed to read pipeline state '{}': {}",
                path.display(),
                e
            ))),
        }
    }
}
