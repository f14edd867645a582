//! Reset of generated artifacts.

use super::{GENERATED_SUBDIRS, Project};
use crate::error::Result;
use crate::fs::{clear_dir_contents, remove_file_if_exists};
use tracing::{debug, info};

/// What `reset_generated` removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    /// Top-level entries removed across the generated directories.
    pub removed_entries: usize,
    /// Whether a phase record was removed.
    pub state_removed: bool,
}

impl Project {
    /// Delete everything the agent generated and the phase record.
    ///
    /// Only the contents of `analysis_scripts/`, `visualization_scripts/` and
    /// `reporting/` are removed; the directories themselves stay. `data/` and
    /// `research_question.md` are never touched. Missing directories and
    /// entries that vanish mid-reset are fine; any other IO fault is returned.
    pub fn reset_generated(&self) -> Result<ResetReport> {
        let mut report = ResetReport::default();

        for subdir in GENERATED_SUBDIRS {
            let dir = self.path.join(subdir);
            let removed = clear_dir_contents(&dir)?;
            debug!(dir = %dir.display(), removed, "cleared generated directory");
            report.removed_entries += removed;
        }

        report.state_removed = remove_file_if_exists(&self.pipeline_state_path())?;

        info!(
            project = %self.name,
            removed_entries = report.removed_entries,
            state_removed = report.state_removed,
            "reset generated artifacts"
        );
        Ok(report)
    }
}
