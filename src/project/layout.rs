//! Scaffolding, research question handling, and readiness checks.

use super::{
    GENERATED_SUBDIRS, PROJECT_SUBDIRS, Project, RESEARCH_QUESTION_TEMPLATE, TEMPLATE_MARKER,
};
use crate::error::{AutoscienceError, Result};
use crate::fs::atomic_write_file;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File counts for a project's directories, for status display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub data_files: usize,
    pub analysis_scripts: usize,
    pub visualization_scripts: usize,
    pub reporting_files: usize,
    pub report_exists: bool,
    pub notebook_exists: bool,
}

impl Project {
    /// Create any missing part of the project layout and return its path.
    ///
    /// Existing directories and files are left alone. The research question
    /// placeholder is written only when no research question file exists.
    pub fn ensure(&self) -> Result<PathBuf> {
        create_dir(&self.projects_root)?;
        create_dir(&self.path)?;
        for subdir in PROJECT_SUBDIRS {
            create_dir(&self.path.join(subdir))?;
        }

        let rq_path = self.research_question_path();
        if !rq_path.exists() {
            debug!(path = %rq_path.display(), "writing research question placeholder");
            atomic_write_file(&rq_path, RESEARCH_QUESTION_TEMPLATE)?;
        }

        Ok(self.path.clone())
    }

    /// Alias for [`Project::ensure`].
    pub fn create(&self) -> Result<PathBuf> {
        self.ensure()
    }

    /// Contents of `research_question.md`, or `None` if the file is missing.
    pub fn research_question(&self) -> Result<Option<String>> {
        let path = self.research_question_path();
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AutoscienceError::UserError(format!(
                "failed to read research question '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// True if the research question has real content (not blank, not the placeholder).
    pub fn has_research_question(&self) -> Result<bool> {
        Ok(self
            .research_question()?
            .is_some_and(|text| !is_template(&text)))
    }

    /// Replace the research question with `question`.
    ///
    /// Blank input is rejected so a stray Enter never wipes an existing question.
    pub fn save_research_question(&self, question: &str) -> Result<()> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AutoscienceError::Validation(
                "research question must not be empty".to_string(),
            ));
        }
        atomic_write_file(
            self.research_question_path(),
            &format!("# Research question\n\n{}\n", question),
        )
    }

    /// Check that an agent run has what it needs: a real research question
    /// and at least one file in `data/`.
    pub fn validate_ready_for_run(&self) -> Result<()> {
        let rq_path = self.research_question_path();
        let Some(text) = self.research_question()? else {
            return Err(AutoscienceError::Validation(format!(
                "missing research question file: {}",
                rq_path.display()
            )));
        };
        if is_template(&text) {
            return Err(AutoscienceError::Validation(format!(
                "{} is empty or still a template.\n\
                 Fix: set your research question before running the agent.",
                rq_path.display()
            )));
        }

        let data_path = self.data_path();
        if !data_path.is_dir() {
            return Err(AutoscienceError::Validation(format!(
                "missing data directory: {}",
                data_path.display()
            )));
        }
        if count_files(&data_path)? == 0 {
            return Err(AutoscienceError::Validation(format!(
                "no files found in {}.\n\
                 Fix: add dataset files before running the agent.",
                data_path.display()
            )));
        }

        Ok(())
    }

    /// Count files in each project directory. Missing directories count as empty.
    pub fn artifact_summary(&self) -> Result<ArtifactSummary> {
        Ok(ArtifactSummary {
            data_files: count_files(&self.data_path())?,
            analysis_scripts: count_files(&self.analysis_scripts_path())?,
            visualization_scripts: count_files(&self.visualization_scripts_path())?,
            reporting_files: count_files(&self.reporting_path())?,
            report_exists: self.report_path().is_file(),
            notebook_exists: self.notebook_path().is_file(),
        })
    }

    /// Generated directories that currently hold at least one entry.
    pub fn non_empty_generated_dirs(&self) -> Result<Vec<&'static str>> {
        let mut dirs = Vec::new();
        for subdir in GENERATED_SUBDIRS {
            let path = self.path.join(subdir);
            let has_entries = match fs::read_dir(&path) {
                Ok(mut entries) => entries.next().is_some(),
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => {
                    return Err(AutoscienceError::UserError(format!(
                        "failed to read directory '{}': {}",
                        path.display(),
                        e
                    )));
                }
            };
            if has_entries {
                dirs.push(*subdir);
            }
        }
        Ok(dirs)
    }
}

/// True if `text` is blank or still the untouched placeholder.
pub(super) fn is_template(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || text.contains(TEMPLATE_MARKER)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        AutoscienceError::UserError(format!(
            "failed to create directory '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Regular files directly inside `dir` (not recursive).
fn count_files(dir: &Path) -> Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(AutoscienceError::UserError(format!(
                "failed to read directory '{}': {}",
                dir.display(),
                e
            )));
        }
    };

    Ok(entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .count())
}
