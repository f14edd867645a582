use crate::commands::Session;
use crate::commands::prompter::Prompter;
use crate::config::Config;
use crate::error::Result;
use crate::project::Project;
use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A scaffolded project with a real research question and one data file.
pub(crate) fn create_ready_project(name: &str) -> (TempDir, Project) {
    let temp_dir = TempDir::new().unwrap();
    let project = Project::open(name, &temp_dir.path().join("projects")).unwrap();
    project.ensure().unwrap();
    project
        .save_research_question("How does rainfall affect crop yield?")
        .unwrap();
    fs::write(
        project.data_path().join("yield.csv"),
        "year,rain_mm,yield_t\n2020,640,3.1\n2021,580,2.7\n",
    )
    .unwrap();
    (temp_dir, project)
}

/// Write the five agent instruction fragments into `dir`.
pub(crate) fn write_agent_fragments(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    for (file, body) in [
        ("orchestrator.md", "ORCHESTRATOR BODY"),
        ("data_architect.md", "DATA ARCHITECT BODY"),
        ("variable_selector.md", "VARIABLE SELECTOR BODY"),
        ("analyst_and_visualizer.md", "ANALYST BODY"),
        ("scientific_writer.md", "WRITER BODY"),
    ] {
        fs::write(dir.join(file), format!("\n{}\n\n", body)).unwrap();
    }
}

/// Write an executable-agnostic script file (run via an interpreter).
pub(crate) fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

/// Session whose agent is `sh` printing a marker, with fragments, env file
/// and projects root all inside `temp_dir`.
pub(crate) fn test_session(temp_dir: &TempDir, project: Project) -> Session {
    let agents_dir = temp_dir.path().join("agents");
    write_agent_fragments(&agents_dir);

    let mut config = Config::default();
    config.projects_root = project.projects_root().to_path_buf();
    config.agents_dir = agents_dir;
    config.env_file = temp_dir.path().join(".env");
    config.agent.command = "sh -c 'echo agent-ran' {prompt}".to_string();
    config.agent.timeout_seconds = 30;
    config.agent.stream = false;
    config.scripts.interpreter = "sh".to_string();
    config.scripts.pattern = "*.sh".to_string();

    Session {
        config,
        project,
        env: BTreeMap::new(),
    }
}

/// Prompter that replays canned answers and records every prompt shown.
///
/// `confirm` is true only for an answer of `y` or `yes`.
pub(crate) struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub(crate) prompts: Vec<String>,
}

impl ScriptedPrompter {
    pub(crate) fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            prompts: Vec::new(),
        }
    }

    fn next(&mut self, prompt: &str) -> String {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted answer for prompt: {}", prompt))
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        Ok(self.next(prompt))
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.next(prompt).trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    fn pause(&mut self, prompt: &str) -> Result<()> {
        self.next(prompt);
        Ok(())
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        Ok(self.next(prompt))
    }
}
