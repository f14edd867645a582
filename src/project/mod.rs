//! Project directory management.
//!
//! A project lives at `{projects_root}/{normalized_name}/`:
//!
//! ```text
//! research_question.md     user-authored, never deleted
//! pipeline_state.txt       current phase (see `crate::state`)
//! data/                    user-supplied inputs, never deleted
//! analysis_scripts/        generated
//! visualization_scripts/   generated
//! reporting/               generated (report.md, {name}_reproducable.ipynb)
//! ```
//!
//! `ensure` is idempotent and non-destructive. `reset_generated` empties the
//! generated directories and drops the phase record so the agent can rerun
//! from a clean slate without losing the user's inputs.

mod layout;
mod naming;
mod reset;


pub use layout::ArtifactSummary;
pub use naming::{normalize_name, path_for};
pub use reset::ResetReport;

use crate::error::Result;
use crate::state::{PipelineState, STATE_FILE};
use std::path::{Path, PathBuf};

/// Subdirectory for user-supplied input files.
pub const DATA_DIR: &str = "data";
/// Subdirectory for generated analysis scripts.
pub const ANALYSIS_SCRIPTS_DIR: &str = "analysis_scripts";
/// Subdirectory for generated visualization scripts.
pub const VISUALIZATION_SCRIPTS_DIR: &str = "visualization_scripts";
/// Subdirectory for the generated report and notebook.
pub const REPORTING_DIR: &str = "reporting";

/// Every subdirectory a complete project has.
pub const PROJECT_SUBDIRS: &[&str] = &[
    DATA_DIR,
    ANALYSIS_SCRIPTS_DIR,
    VISUALIZATION_SCRIPTS_DIR,
    REPORTING_DIR,
];

/// Subdirectories whose contents `reset_generated` deletes.
pub const GENERATED_SUBDIRS: &[&str] = &[
    ANALYSIS_SCRIPTS_DIR,
    VISUALIZATION_SCRIPTS_DIR,
    REPORTING_DIR,
];

/// Research question document at the project root.
pub const RESEARCH_QUESTION_FILE: &str = "research_question.md";

/// Report written by the agent under `reporting/`.
pub const REPORT_FILE: &str = "report.md";

/// Marker present only in the untouched placeholder.
pub const TEMPLATE_MARKER: &str = "Describe the goal";

/// Placeholder written by `ensure` when no research question exists.
pub const RESEARCH_QUESTION_TEMPLATE: &str =
    "# Research question\n\n<!-- Describe the goal and constraints of this research. -->\n";

/// A research project rooted under a projects directory.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    projects_root: PathBuf,
    path: PathBuf,
}

impl Project {
    /// Resolve a project by raw name. Nothing is created on disk.
    ///
    /// Fails with `InvalidName` if the name is empty after normalization.
    pub fn open(raw_name: &str, projects_root: &Path) -> Result<Self> {
        let name = normalize_name(raw_name)?;
        let projects_root = naming::absolute_root(projects_root)?;
        let path = projects_root.join(&name);
        Ok(Self {
            name,
            projects_root,
            path,
        })
    }

    /// Normalized project name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn projects_root(&self) -> &Path {
        &self.projects_root
    }

    /// True if the project directory exists. Subdirectories are not checked.
    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Phase store for this project.
    pub fn state(&self) -> PipelineState {
        PipelineState::new(&self.path)
    }

    pub fn research_question_path(&self) -> PathBuf {
        self.path.join(RESEARCH_QUESTION_FILE)
    }

    pub fn pipeline_state_path(&self) -> PathBuf {
        self.path.join(STATE_FILE)
    }

    pub fn data_path(&self) -> PathBuf {
        self.path.join(DATA_DIR)
    }

    pub fn analysis_scripts_path(&self) -> PathBuf {
        self.path.join(ANALYSIS_SCRIPTS_DIR)
    }

    pub fn visualization_scripts_path(&self) -> PathBuf {
        self.path.join(VISUALIZATION_SCRIPTS_DIR)
    }

    pub fn reporting_path(&self) -> PathBuf {
        self.path.join(REPORTING_DIR)
    }

    pub fn report_path(&self) -> PathBuf {
        self.reporting_path().join(REPORT_FILE)
    }

    /// File name of the reproducibility notebook the agent writes.
    pub fn notebook_name(&self) -> String {
        format!("{}_reproducable.ipynb", self.name)
    }

    pub fn notebook_path(&self) -> PathBuf {
        self.reporting_path().join(self.notebook_name())
    }
}
