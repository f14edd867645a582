//! Implementation of `--status`.
//!
//! Prints the recorded pipeline phase and a count of what the agent has
//! produced so far. Read-only.

use super::Session;
use crate::error::Result;
use crate::project::{
    ANALYSIS_SCRIPTS_DIR, DATA_DIR, REPORTING_DIR, VISUALIZATION_SCRIPTS_DIR,
};
use crate::state::Phase;
use std::fmt::Write;

pub fn cmd_status(session: &Session) -> Result<()> {
    session.require_existing_project()?;
    print!("{}", render_status(session)?);
    Ok(())
}

fn render_status(session: &Session) -> Result<String> {
    let project = &session.project;
    let phase = project.state().read()?;
    let summary = project.artifact_summary()?;
    let question = if project.has_research_question()? {
        "set"
    } else {
        "missing"
    };

    let mut out = String::new();
    // fmt::Write into a String cannot fail
    let _ = writeln!(out, "Project: {}", project.name());
    let _ = writeln!(out, "Path:    {}", project.path().display());
    let _ = writeln!(
        out,
        "Phase:   {} ({}/{})",
        phase,
        phase.ordinal() + 1,
        Phase::ALL.len()
    );
    let _ = writeln!(out, "Research question: {}", question);
    let _ = writeln!(out);
    let _ = writeln!(out, "Artifacts:");
    for (dir, count) in [
        (DATA_DIR, summary.data_files),
        (ANALYSIS_SCRIPTS_DIR, summary.analysis_scripts),
        (VISUALIZATION_SCRIPTS_DIR, summary.visualization_scripts),
        (REPORTING_DIR, summary.reporting_files),
    ] {
        let _ = writeln!(out, "  {:24} {:>3}", format!("{}/", dir), count);
    }
    let _ = writeln!(out, "  report:   {}", yes_no(summary.report_exists));
    let _ = writeln!(out, "  notebook: {}", yes_no(summary.notebook_exists));
    Ok(out)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Project;
    use crate::test_support::{create_ready_project, test_session};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn status_of_fresh_ready_project() {
        let (temp_dir, project) = create_ready_project("rain");
        let session = test_session(&temp_dir, project);

        let text = render_status(&session).unwrap();

        assert!(text.contains("Project: rain\n"));
        assert!(text.contains("Phase:   Parsing Data (1/5)\n"));
        assert!(text.contains("Research question: set\n"));
        assert!(text.contains("  data/                      1\n"));
        assert!(text.contains("  report:   no\n"));
    }

    #[test]
    fn status_reflects_phase_and_reporting() {
        let (temp_dir, project) = create_ready_project("rain");
        let session = test_session(&temp_dir, project);
        session.project.state().write(Phase::Reporting).unwrap();
        fs::write(session.project.report_path(), "# Report\n").unwrap();
        fs::write(session.project.notebook_path(), "{}").unwrap();

        let text = render_status(&session).unwrap();

        assert!(text.contains("Phase:   Reporting (4/5)\n"));
        assert!(text.contains("  reporting/                 2\n"));
        assert!(text.contains("  report:   yes\n"));
        assert!(text.contains("  notebook: yes\n"));
    }

    #[test]
    fn missing_project_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let project = Project::open("ghost", &temp_dir.path().join("projects")).unwrap();
        let session = test_session(&temp_dir, project);

        let err = cmd_status(&session).unwrap_err();

        assert!(err.to_string().contains("does not exist"));
        assert!(!session.project.path().exists());
    }
}
