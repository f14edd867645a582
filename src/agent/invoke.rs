//! Agent subprocess adapter.
//!
//! Launches the configured agent command with the composed prompt, streams
//! and captures its output, and enforces the wall-clock limit.

use super::prompt::{TemplateError, render_template, vars};
use crate::config::AgentSettings;
use crate::error::{AutoscienceError, Result};
use crate::process::{CaptureOptions, run_captured};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Limit for the `login status` check.
const LOGIN_CHECK_TIMEOUT: Duration = Duration::from_secs(30);

/// Captured result of one agent run.
#[derive(Debug, Clone)]
pub struct AgentOutput {
    /// Sanitized stdout.
    pub stdout: String,
    /// Sanitized stderr.
    pub stderr: String,
    /// Exit code, or `None` if the agent was terminated by a signal.
    pub exit_code: Option<i32>,
    pub duration: Duration,
}

impl AgentOutput {
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Run the agent with `prompt` from `project_path`.
///
/// Environment precedence: the inherited environment, then
/// `settings.environment`, then `extra_env`.
///
/// A non-zero exit is reported in [`AgentOutput::exit_code`], not as an error.
/// A missing agent binary maps to [`AutoscienceError::AgentNotFound`] and an
/// exceeded limit to [`AutoscienceError::Timeout`].
pub fn invoke_agent(
    settings: &AgentSettings,
    prompt: &str,
    project_path: &Path,
    extra_env: &BTreeMap<String, String>,
) -> Result<AgentOutput> {
    let args = render_command(&settings.command, prompt, project_path)?;
    let (program, program_args) = args.split_first().ok_or_else(|| {
        AutoscienceError::UserError(format!(
            "agent command is empty after parsing: '{}'",
            settings.command
        ))
    })?;

    let mut command = Command::new(program);
    command.args(program_args).current_dir(project_path);
    for (key, value) in settings.environment.iter().chain(extra_env) {
        command.env(key, value);
    }

    let options = CaptureOptions {
        timeout: Some(settings.timeout()),
        echo: settings.stream,
        sanitize: true,
    };

    info!(
        program = %program,
        project = %project_path.display(),
        timeout_seconds = settings.timeout_seconds,
        "starting agent"
    );

    let output = run_captured(&mut command, &options).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            AutoscienceError::AgentNotFound(program.clone())
        } else {
            AutoscienceError::UserError(format!(
                "failed to execute agent command '{}': {}",
                program, e
            ))
        }
    })?;

    if output.timed_out {
        warn!(program = %program, "agent killed after timeout");
        return Err(AutoscienceError::Timeout(settings.timeout_seconds));
    }

    debug!(
        exit_code = ?output.exit_code,
        duration_ms = output.duration.as_millis() as u64,
        "agent finished"
    );

    Ok(AgentOutput {
        stdout: output.stdout,
        stderr: output.stderr,
        exit_code: output.exit_code,
        duration: output.duration,
    })
}

/// Whether `<agent program> login status` reports an active session.
///
/// Any failure to run the check counts as "not logged in".
pub fn agent_login_active(settings: &AgentSettings) -> bool {
    let program = match shell_words::split(&settings.command) {
        Ok(args) => match args.into_iter().next() {
            Some(program) => program,
            None => return false,
        },
        Err(_) => return false,
    };

    let mut command = Command::new(&program);
    command.args(["login", "status"]);
    for (key, value) in &settings.environment {
        command.env(key, value);
    }

    let options = CaptureOptions {
        timeout: Some(LOGIN_CHECK_TIMEOUT),
        echo: false,
        sanitize: true,
    };
    match run_captured(&mut command, &options) {
        Ok(output) => output.is_success(),
        Err(e) => {
            debug!(program = %program, error = %e, "login status check failed");
            false
        }
    }
}

/// Split the command template, then substitute `{prompt}` and
/// `{project_path}` inside each argument.
///
/// Splitting first keeps the prompt a single argument no matter what
/// quotes or whitespace it contains.
fn render_command(template: &str, prompt: &str, project_path: &Path) -> Result<Vec<String>> {
    let parts = shell_words::split(template).map_err(|e| {
        AutoscienceError::UserError(format!(
            "failed to parse agent command '{}': {}\n\
             Fix: check for unmatched quotes or invalid escape sequences.",
            template, e
        ))
    })?;

    let variables = vars([
        ("prompt", prompt.to_string()),
        ("project_path", project_path.display().to_string()),
    ]);

    parts
        .iter()
        .map(|part| {
            render_template(part, &variables).map_err(|e| match e {
                TemplateError::UndefinedVariable { name, .. } => AutoscienceError::UserError(
                    format!(
                        "agent command template references undefined variable '{}'\n\
                         Command: {}\n\
                         Available variables: {{prompt}}, {{project_path}}",
                        name, template
                    ),
                ),
                other => AutoscienceError::UserError(format!(
                    "invalid agent command template '{}': {}",
                    template, other
                )),
            })
        })
        .collect()
}
