//! Tests for config functionality.

use crate::config::{CONFIG_FILE, Config};
use crate::test_support::DirGuard;
use serial_test::serial;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.projects_root, PathBuf::from("projects"));
    assert_eq!(config.agents_dir, PathBuf::from("agents"));
    assert_eq!(config.env_file, PathBuf::from(".env"));
    assert_eq!(
        config.agent.command,
        "codex exec --skip-git-repo-check {prompt}"
    );
    assert_eq!(config.agent.timeout_seconds, 1800);
    assert!(config.agent.stream);
    assert!(config.agent.environment.is_empty());
    assert_eq!(config.scripts.interpreter, "python3");
    assert_eq!(config.scripts.timeout_seconds, Some(300));
    assert_eq!(config.scripts.pattern, "*.py");
    config.validate().unwrap();
}

#[test]
fn test_parse_empty_yaml_uses_defaults() {
    let config = Config::from_yaml("").unwrap();
    assert_eq!(config.agent.timeout_seconds, 1800);
    assert_eq!(config.projects_root, PathBuf::from("projects"));
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
projects_root: /srv/research
agent:
  timeout_seconds: 60
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.projects_root, PathBuf::from("/srv/research"));
    assert_eq!(config.agent.timeout_seconds, 60);
    // untouched fields in a partially specified section keep their defaults
    assert_eq!(
        config.agent.command,
        "codex exec --skip-git-repo-check {prompt}"
    );
    assert!(config.agent.stream);
    assert_eq!(config.scripts.interpreter, "python3");
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
projects_root: work/projects
agents_dir: prompts
env_file: secrets.env
agent:
  command: "my-agent run --cwd {project_path} {prompt}"
  timeout_seconds: 90
  stream: false
  environment:
    AGENT_MODE: batch
scripts:
  interpreter: /usr/bin/python3.12
  timeout_seconds: null
  pattern: "step_*.py"
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.agents_dir, PathBuf::from("prompts"));
    assert_eq!(config.env_file, PathBuf::from("secrets.env"));
    assert!(!config.agent.stream);
    assert_eq!(config.agent.environment["AGENT_MODE"], "batch");
    assert_eq!(config.scripts.interpreter, "/usr/bin/python3.12");
    assert_eq!(config.scripts.timeout_seconds, None);
    assert_eq!(config.scripts.pattern, "step_*.py");
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
future_option: 42
agent:
  retries: 3
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.agent.timeout_seconds, 1800);
}

#[test]
fn test_invalid_yaml_is_error() {
    let err = Config::from_yaml("agent: [not, a, map").unwrap_err();
    assert!(err.to_string().contains("failed to parse config YAML"));
}

#[test]
fn test_command_without_prompt_placeholder_is_rejected() {
    let yaml = "agent:\n  command: \"codex exec\"\n";
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("{prompt}"));
}

#[test]
fn test_prompt_as_program_is_rejected() {
    let yaml = "agent:\n  command: \"{prompt}\"\n";
    assert!(Config::from_yaml(yaml).is_err());
}

#[test]
fn test_unbalanced_quotes_in_command_are_rejected() {
    let yaml = "agent:\n  command: \"codex exec '{prompt}\"\n";
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("could not be parsed"));
}

#[test]
fn test_zero_timeouts_are_rejected() {
    assert!(Config::from_yaml("agent:\n  timeout_seconds: 0\n").is_err());
    assert!(Config::from_yaml("scripts:\n  timeout_seconds: 0\n").is_err());
}

#[test]
fn test_invalid_glob_is_rejected() {
    let err = Config::from_yaml("scripts:\n  pattern: \"[*.py\"\n").unwrap_err();
    assert!(err.to_string().contains("not a valid glob"));
}

#[test]
fn test_yaml_roundtrip_keeps_values() {
    let mut config = Config::default();
    config.agent.timeout_seconds = 42;
    config.scripts.timeout_seconds = None;

    let parsed = Config::from_yaml(&serde_yaml::to_string(&config).unwrap()).unwrap();

    assert_eq!(parsed.agent.timeout_seconds, 42);
    assert_eq!(parsed.scripts.timeout_seconds, None);
}

#[test]
fn test_load_missing_explicit_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Config::discover(Some(&temp_dir.path().join("nope.yaml"))).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
#[serial]
fn test_discover_uses_file_in_current_directory() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(CONFIG_FILE),
        "projects_root: elsewhere\n",
    )
    .unwrap();
    let _guard = DirGuard::new(temp_dir.path());

    let config = Config::discover(None).unwrap();

    assert_eq!(config.projects_root, PathBuf::from("elsewhere"));
}

#[test]
#[serial]
fn test_discover_without_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let _guard = DirGuard::new(temp_dir.path());

    let config = Config::discover(None).unwrap();

    assert_eq!(config.projects_root, PathBuf::from("projects"));
}
