//! Implementation of `--advance`: move the pipeline phase forward one step.

use super::Session;
use crate::error::Result;
use crate::events::EventAction;
use crate::state::Phase;
use serde_json::json;

/// What `--advance` did to the phase record.
#[derive(Debug, PartialEq, Eq)]
enum AdvanceOutcome {
    Advanced(Phase),
    AlreadyDone,
    /// The record held this unknown token; nothing was written.
    Unrecognized(String),
}

pub fn cmd_advance(session: &Session) -> Result<()> {
    session.require_existing_project()?;
    match advance_phase(session)? {
        AdvanceOutcome::Advanced(phase) => println!("Advanced to: {}", phase),
        AdvanceOutcome::AlreadyDone => {
            println!("Pipeline already at {}; nothing to advance.", Phase::Done)
        }
        AdvanceOutcome::Unrecognized(token) => println!(
            "Unrecognized phase '{}' in {}, treated as {}; nothing was advanced.",
            token,
            session.project.pipeline_state_path().display(),
            Phase::first()
        ),
    }
    Ok(())
}

/// Advance and log. Only a persisted transition is recorded as an event.
fn advance_phase(session: &Session) -> Result<AdvanceOutcome> {
    let state = session.project.state();
    if let Some(token) = state.unrecognized_token()? {
        return Ok(AdvanceOutcome::Unrecognized(token));
    }

    let from = state.read()?;
    let Some(to) = state.advance()? else {
        return Ok(AdvanceOutcome::AlreadyDone);
    };

    session.record(
        EventAction::Advance,
        json!({ "from": from.as_str(), "to": to.as_str() }),
    )?;
    Ok(AdvanceOutcome::Advanced(to))
}
