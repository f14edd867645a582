//! Command implementations for autoscience.
//!
//! This module provides the dispatcher that routes the selected CLI action
//! to its implementation, plus the [`Session`] every action shares.

mod advance;
mod agent_run;
mod credentials;
pub(crate) mod prompter;
mod rerun;
mod run;
mod scripts_cmd;
mod status;

use prompter::ConsolePrompter;

use crate::cli::{Action, Cli};
use crate::config::Config;
use crate::error::{AutoscienceError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::project::Project;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Resolved configuration and project for one invocation.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    pub project: Project,
    /// Snapshot of the ambient process environment.
    pub env: BTreeMap<String, String>,
}

impl Session {
    /// Load config, apply CLI overrides and resolve the project.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = Config::discover(cli.config.as_deref())?;
        if let Some(root) = &cli.projects_root {
            config.projects_root = root.clone();
        }
        if let Some(seconds) = cli.timeout_seconds {
            config.agent.timeout_seconds = seconds;
        }
        if cli.no_stream {
            config.agent.stream = false;
        }
        config.validate()?;

        let project = Project::open(&cli.project, &config.projects_root)?;
        debug!(project = %project.path().display(), "resolved project");

        Ok(Self {
            config,
            project,
            env: std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
                .collect(),
        })
    }

    /// Append a project-scoped event to the audit log.
    pub fn record(&self, action: EventAction, details: Value) -> Result<()> {
        let event = Event::new(action)
            .with_project(self.project.name())
            .with_details(details);
        append_event(self.project.projects_root(), &event)
    }

    /// Fail unless the project directory already exists.
    pub fn require_existing_project(&self) -> Result<()> {
        if self.project.exists() {
            Ok(())
        } else {
            Err(AutoscienceError::UserError(format!(
                "project '{}' does not exist at '{}'\n\
                 Fix: run `autoscience --project {}` to create it.",
                self.project.name(),
                self.project.path().display(),
                self.project.name()
            )))
        }
    }
}

/// Dispatch the selected action.
pub fn dispatch(cli: Cli) -> Result<()> {
    let session = Session::from_cli(&cli)?;

    match cli.action() {
        Action::Run => run::cmd_run(&session, &mut ConsolePrompter),
        Action::ClearAndRun => rerun::cmd_clear_and_run(&session, &mut ConsolePrompter),
        Action::Status => status::cmd_status(&session),
        Action::Advance => advance::cmd_advance(&session),
        Action::RunScripts => scripts_cmd::cmd_run_scripts(&session),
    }
}
