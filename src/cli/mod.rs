//! CLI argument parsing for autoscience.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the argument surface; actual implementations
//! are in the `commands` module.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// AutoScience: run a research project from setup through agent analysis.
///
/// Each project is a folder under the projects root holding the research
/// question, uploaded data, generated scripts, reporting artifacts and the
/// pipeline phase record.
#[derive(Parser, Debug)]
#[command(name = "autoscience")]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .args(["clear_and_run", "status", "advance", "run_scripts"])
        .multiple(false)
))]
pub struct Cli {
    /// Project name (folder under the projects root).
    #[arg(long, short = 'p', value_name = "NAME")]
    pub project: String,

    /// Root directory for projects (default: `projects_root` from config).
    #[arg(long, value_name = "PATH")]
    pub projects_root: Option<PathBuf>,

    /// Clear generated artifacts (analysis, visualization, reporting and the
    /// pipeline state) while keeping data and research_question.md, then
    /// rerun the agent.
    #[arg(long, alias = "clear-and-rerun")]
    pub clear_and_run: bool,

    /// Print the pipeline phase and an artifact summary, then exit.
    #[arg(long)]
    pub status: bool,

    /// Advance the pipeline phase by one step, then exit.
    #[arg(long)]
    pub advance: bool,

    /// Run analysis then visualization scripts and print their results.
    #[arg(long)]
    pub run_scripts: bool,

    /// Config file (default: autoscience.yaml in the current directory, if present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the agent timeout in seconds.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_seconds: Option<u64>,

    /// Do not echo agent output while it runs.
    #[arg(long)]
    pub no_stream: bool,

    /// Enable debug logging on stderr.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// What a single invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Interactive setup followed by an agent run.
    Run,
    ClearAndRun,
    Status,
    Advance,
    RunScripts,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn action(&self) -> Action {
        if self.clear_and_run {
            Action::ClearAndRun
        } else if self.status {
            Action::Status
        } else if self.advance {
            Action::Advance
        } else if self.run_scripts {
            Action::RunScripts
        } else {
            Action::Run
        }
    }
}
