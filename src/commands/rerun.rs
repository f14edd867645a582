//! Clear generated artifacts and rerun the agent on the same inputs.

use super::Session;
use super::agent_run::launch_agent;
use super::prompter::Prompter;
use crate::error::Result;
use crate::events::EventAction;
use serde_json::json;

/// Keep `data/` and the research question, wipe everything the agent
/// produced, then run the agent again.
///
/// Readiness is checked before anything is deleted, so a project that could
/// not be rerun is left untouched.
pub fn cmd_clear_and_run(session: &Session, prompter: &mut dyn Prompter) -> Result<()> {
    let project = &session.project;
    println!(
        "Clearing generated artifacts and rerunning project: {}",
        project.name()
    );

    project.ensure()?;
    project.validate_ready_for_run()?;

    let populated = project.non_empty_generated_dirs()?;
    if !populated.is_empty() {
        let listed: Vec<String> = populated.iter().map(|dir| format!("{}/", dir)).collect();
        println!("Clearing: {}", listed.join(", "));
    }

    let report = project.reset_generated()?;
    session.record(
        EventAction::Reset,
        json!({
            "cleared_dirs": populated,
            "removed_entries": report.removed_entries,
            "state_removed": report.state_removed,
        }),
    )?;
    println!(
        "Removed {} generated entr{}{}.",
        report.removed_entries,
        if report.removed_entries == 1 { "y" } else { "ies" },
        if report.state_removed {
            " and the pipeline state"
        } else {
            ""
        }
    );

    launch_agent(session, prompter)?;
    println!("Clear-and-rerun completed.");
    Ok(())
}
