//! Implementation of `--run-scripts`.
//!
//! Re-executes the generated analysis scripts, then the visualization
//! scripts, and prints each result. Fails if any script failed.

use super::Session;
use crate::error::{AutoscienceError, Result};
use crate::events::EventAction;
use crate::project::{ANALYSIS_SCRIPTS_DIR, VISUALIZATION_SCRIPTS_DIR};
use crate::scripts::{RunResult, ScriptRunner};
use serde_json::json;

/// Folders run in order; visualizations usually read analysis outputs.
const SCRIPT_FOLDERS: &[&str] = &[ANALYSIS_SCRIPTS_DIR, VISUALIZATION_SCRIPTS_DIR];

pub fn cmd_run_scripts(session: &Session) -> Result<()> {
    session.require_existing_project()?;
    let results = run_project_scripts(session)?;

    if results.is_empty() {
        println!(
            "No scripts matching '{}' found in {}.",
            session.config.scripts.pattern,
            SCRIPT_FOLDERS.join(" or ")
        );
        return Ok(());
    }

    for result in &results {
        println!("{}", result.summary());
        println!();
    }

    let failed = results.iter().filter(|r| !r.success).count();
    println!("{} of {} scripts succeeded.", results.len() - failed, results.len());
    if failed > 0 {
        return Err(AutoscienceError::UserError(format!(
            "{} script{} failed",
            failed,
            if failed == 1 { "" } else { "s" }
        )));
    }
    Ok(())
}

fn run_project_scripts(session: &Session) -> Result<Vec<RunResult>> {
    let runner = ScriptRunner::from_settings(session.project.path(), &session.config.scripts);

    let mut results = Vec::new();
    for folder in SCRIPT_FOLDERS {
        results.extend(runner.run_scripts_in_folder(folder, &session.config.scripts.pattern)?);
    }

    let failed = results.iter().filter(|r| !r.success).count();
    session.record(
        EventAction::RunScripts,
        json!({ "total": results.len(), "failed": failed }),
    )?;
    Ok(results)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::test_support::{create_ready_project, test_session, write_script};

    #[test]
    fn runs_analysis_before_visualization() {
        let (temp_dir, project) = create_ready_project("rain");
        let session = test_session(&temp_dir, project);
        write_script(
            &session.project.visualization_scripts_path(),
            "01_plot.sh",
            "echo plot\n",
        );
        write_script(
            &session.project.analysis_scripts_path(),
            "02_model.sh",
            "echo model\n",
        );
        write_script(
            &session.project.analysis_scripts_path(),
            "01_load.sh",
            "ls ../data\n",
        );

        let results = run_project_scripts(&session).unwrap();

        let outputs: Vec<_> = results.iter().map(|r| r.stdout.as_str()).collect();
        assert_eq!(outputs, ["yield.csv\n", "model\n", "plot\n"]);
        cmd_run_scripts(&session).unwrap();
    }

    #[test]
    fn any_failure_fails_the_command() {
        let (temp_dir, project) = create_ready_project("rain");
        let session = test_session(&temp_dir, project);
        write_script(&session.project.analysis_scripts_path(), "ok.sh", "true\n");
        write_script(&session.project.analysis_scripts_path(), "bad.sh", "exit 1\n");

        let err = cmd_run_scripts(&session).unwrap_err();

        assert_eq!(err.to_string(), "1 script failed");
    }

    #[test]
    fn no_scripts_is_not_an_error() {
        let (temp_dir, project) = create_ready_project("rain");
        let session = test_session(&temp_dir, project);

        assert!(run_project_scripts(&session).unwrap().is_empty());
        cmd_run_scripts(&session).unwrap();
    }
}
