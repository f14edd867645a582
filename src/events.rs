//! Append-only audit log for project lifecycle events.
//!
//! Events are stored in NDJSON format (one JSON object per line) in
//! `<projects_root>/.autoscience/events.ndjson`, outside every project
//! directory so the project layout stays untouched.
//!
//! # Event Format
//!
//! - `ts`: RFC3339 timestamp
//! - `action`: what happened (create, reset, advance, agent_start, ...)
//! - `actor`: `user@HOST`
//! - `project`: project name, for project-scoped events
//! - `details`: freeform object with action-specific details

use crate::error::{AutoscienceError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory under the projects root holding tool metadata.
pub const META_DIR: &str = ".autoscience";

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Project directory scaffolded
    Create,
    /// Research question written
    SaveQuestion,
    /// Generated artifacts and state cleared
    Reset,
    /// Pipeline phase advanced
    Advance,
    /// Agent launched
    AgentStart,
    /// Agent exited
    AgentFinish,
    /// Generated scripts executed
    RunScripts,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Create => write!(f, "create"),
            EventAction::SaveQuestion => write!(f, "save_question"),
            EventAction::Reset => write!(f, "reset"),
            EventAction::Advance => write!(f, "advance"),
            EventAction::AgentStart => write!(f, "agent_start"),
            EventAction::AgentFinish => write!(f, "agent_finish"),
            EventAction::RunScripts => write!(f, "run_scripts"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,
    pub action: EventAction,
    pub actor: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    pub details: Value,
}

impl Event {
    /// Create an event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: get_actor_string(),
            project: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            AutoscienceError::UserError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

fn get_actor_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}

pub fn events_file_path(projects_root: &Path) -> PathBuf {
    projects_root.join(META_DIR).join("events.ndjson")
}

/// Append `event` as one line to the log under `projects_root`.
///
/// The metadata directory and log file are created on first use.
pub fn append_event(projects_root: &Path, event: &Event) -> Result<()> {
    let events_file = events_file_path(projects_root);
    let json_line = event.to_ndjson_line()?;

    let events_dir = projects_root.join(META_DIR);
    fs::create_dir_all(&events_dir).map_err(|e| {
        AutoscienceError::UserError(format!(
            "failed to create events directory '{}': {}",
            events_dir.display(),
            e
        ))
    })?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            AutoscienceError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        AutoscienceError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        AutoscienceError::UserError(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn read_lines(root: &Path) -> Vec<Value> {
        fs::read_to_string(events_file_path(root))
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_event_creation() {
        let event = Event::new(EventAction::Create);
        assert_eq!(event.action, EventAction::Create);
        assert!(event.actor.contains('@'));
        assert!(event.project.is_none());
        assert_eq!(event.details, json!({}));
    }

    #[test]
    fn test_event_without_project_omits_field() {
        let line = Event::new(EventAction::Reset).to_ndjson_line().unwrap();
        assert!(!line.contains("\"project\""));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_event_action_serialization_matches_display() {
        for action in [
            EventAction::Create,
            EventAction::SaveQuestion,
            EventAction::Reset,
            EventAction::Advance,
            EventAction::AgentStart,
            EventAction::AgentFinish,
            EventAction::RunScripts,
        ] {
            assert_eq!(
                serde_json::to_string(&action).unwrap(),
                format!("\"{}\"", action)
            );
        }
    }

    #[test]
    fn test_append_event_creates_meta_dir_and_lines() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("projects");

        append_event(
            &root,
            &Event::new(EventAction::Create).with_project("rain"),
        )
        .unwrap();
        append_event(
            &root,
            &Event::new(EventAction::Advance)
                .with_project("rain")
                .with_details(json!({"phase": "Visualizing"})),
        )
        .unwrap();

        let content = fs::read_to_string(events_file_path(&root)).unwrap();
        assert!(content.ends_with('\n'));

        let lines = read_lines(&root);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["action"], "create");
        assert_eq!(lines[0]["project"], "rain");
        assert_eq!(lines[1]["details"]["phase"], "Visualizing");
        // ts is RFC3339
        let ts = lines[1]["ts"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn test_event_roundtrip() {
        let event = Event::new(EventAction::AgentFinish)
            .with_project("rain")
            .with_details(json!({"exit_code": 0}));
        let parsed: Event = serde_json::from_str(&event.to_ndjson_line().unwrap()).unwrap();
        assert_eq!(parsed.action, EventAction::AgentFinish);
        assert_eq!(parsed.project.as_deref(), Some("rain"));
        assert_eq!(parsed.ts, event.ts);
    }
}
