//! Shared agent launch used by normal runs and clear-and-rerun.

use super::Session;
use super::credentials::agent_environment;
use super::prompter::Prompter;
use crate::agent::prompt::compose_prompt;
use crate::agent::{AgentOutput, invoke_agent};
use crate::error::Result;
use crate::events::EventAction;
use serde_json::json;
use tracing::warn;

/// Compose the workflow prompt and run the agent from the project directory.
///
/// The caller is responsible for validating the project first.
pub fn launch_agent(session: &Session, prompter: &mut dyn Prompter) -> Result<AgentOutput> {
    let extra_env = agent_environment(session, prompter)?;
    let prompt = compose_prompt(&session.project, &session.config.agents_dir)?;
    let streamed = session.config.agent.stream;

    println!(
        "Calling the agent to parse data, select variables, run analysis, \
         generate visualizations, and write reporting artifacts..."
    );
    if streamed {
        println!("(Output will stream below; this may take several minutes.)");
    }
    println!();

    session.record(
        EventAction::AgentStart,
        json!({
            "command": session.config.agent.command,
            "timeout_seconds": session.config.agent.timeout_seconds,
        }),
    )?;

    let result = invoke_agent(
        &session.config.agent,
        &prompt,
        session.project.path(),
        &extra_env,
    );

    let details = match &result {
        Ok(output) => json!({
            "exit_code": output.exit_code,
            "duration_ms": output.duration.as_millis() as u64,
        }),
        Err(e) => json!({ "error": e.to_string() }),
    };
    // The agent's own outcome decides the exit code, not the audit log.
    if let Err(e) = session.record(EventAction::AgentFinish, details) {
        warn!(error = %e, "failed to record agent finish event");
    }

    let output = result?;
    let (out, err) = render_outcome(&output, streamed);
    print!("{}", out);
    eprint!("{}", err);
    Ok(output)
}

/// Text for stdout and stderr after a run. Captured output is included only
/// when it was not already streamed.
fn render_outcome(output: &AgentOutput, streamed: bool) -> (String, String) {
    let mut out = String::new();
    let mut err = String::new();

    if !streamed && !output.stdout.trim().is_empty() {
        out.push_str(output.stdout.trim_end());
        out.push('\n');
    }
    out.push('\n');

    if output.is_success() {
        out.push_str("Agent run finished.\n");
    } else {
        let code = output
            .exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        out.push_str(&format!("Agent run finished with exit status {}.\n", code));
    }

    if !streamed && !output.stderr.trim().is_empty() {
        err.push_str(output.stderr.trim_end());
        err.push('\n');
    }

    (out, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutoscienceError;
    use crate::test_support::{ScriptedPrompter, create_ready_project, test_session};
    use std::time::Duration;

    fn output(stdout: &str, stderr: &str, exit_code: Option<i32>) -> AgentOutput {
        AgentOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
            duration: Duration::from_millis(5),
        }
    }

    #[test]
    fn captured_output_is_shown_when_not_streamed() {
        let (out, err) = render_outcome(&output("step 1\nstep 2\n", "warn\n", Some(0)), false);

        assert_eq!(out, "step 1\nstep 2\n\nAgent run finished.\n");
        assert_eq!(err, "warn\n");
    }

    #[test]
    fn streamed_output_is_not_repeated() {
        let (out, err) = render_outcome(&output("step 1\n", "oops\n", Some(2)), true);

        assert_eq!(out, "\nAgent run finished with exit status 2.\n");
        assert!(err.is_empty());
    }

    #[test]
    fn signal_exit_is_named() {
        let (out, _) = render_outcome(&output("", "", None), false);
        assert!(out.ends_with("Agent run finished with exit status signal.\n"));
    }

    #[cfg(unix)]
    #[test]
    fn non_streamed_run_surfaces_agent_stdout() {
        let (temp_dir, project) = create_ready_project("rain");
        let mut session = test_session(&temp_dir, project);
        session
            .env
            .insert("OPENAI_API_KEY".to_string(), "sk-test".to_string());
        assert!(!session.config.agent.stream);

        let output = launch_agent(&session, &mut ScriptedPrompter::new(&[])).unwrap();

        assert_eq!(output.stdout, "agent-ran\n");
        let (out, _) = render_outcome(&output, session.config.agent.stream);
        assert!(out.starts_with("agent-ran\n"));
    }

    #[cfg(unix)]
    #[test]
    fn audit_log_failure_does_not_mask_agent_timeout() {
        let (temp_dir, project) = create_ready_project("rain");
        let mut session = test_session(&temp_dir, project);
        // The agent replaces the event log with a directory, then hangs.
        session.config.agent.command = "sh -c 'rm -f ../.autoscience/events.ndjson; \
             mkdir ../.autoscience/events.ndjson; exec sleep 30' {prompt}"
            .to_string();
        session.config.agent.timeout_seconds = 1;
        session
            .env
            .insert("OPENAI_API_KEY".to_string(), "sk-test".to_string());

        let err = launch_agent(&session, &mut ScriptedPrompter::new(&[])).unwrap_err();

        assert!(matches!(err, AutoscienceError::Timeout(1)));
        assert_eq!(err.exit_code(), crate::exit_codes::TIMEOUT);
    }
}
