//! Interactive run: scaffold the project, collect the research question,
//! wait for data, then hand off to the agent.

use super::Session;
use super::agent_run::launch_agent;
use super::prompter::Prompter;
use crate::error::Result;
use crate::events::EventAction;
use crate::project::{PROJECT_SUBDIRS, RESEARCH_QUESTION_FILE};
use serde_json::json;

/// Characters of an existing question shown before asking to replace it.
const QUESTION_PREVIEW_CHARS: usize = 500;

pub fn cmd_run(session: &Session, prompter: &mut dyn Prompter) -> Result<()> {
    let project = &session.project;

    let existed = project.exists();
    let path = project.ensure()?;
    if !existed {
        session.record(EventAction::Create, json!({ "path": path.display().to_string() }))?;
    }

    println!("Project ready: {}", path.display());
    println!("  {}", RESEARCH_QUESTION_FILE);
    for dir in PROJECT_SUBDIRS {
        println!("  {}/", dir);
    }
    println!();

    collect_research_question(session, prompter)?;

    println!();
    println!("---");
    println!("Next: upload your data into the project's data folder:");
    println!("  {}", project.data_path().display());
    println!("  (PDFs, CSVs, or other files you want analyzed)");
    println!("---");
    prompter.pause("Press Enter when you have uploaded your data and want to run the analysis")?;

    project.validate_ready_for_run()?;

    launch_agent(session, prompter)?;
    Ok(())
}

fn collect_research_question(session: &Session, prompter: &mut dyn Prompter) -> Result<()> {
    let project = &session.project;
    let ask = format!(
        "Enter your research question for {} (goal and constraints)",
        project.name()
    );

    if project.has_research_question()? {
        let existing = project.research_question()?.unwrap_or_default();
        println!("Current research question ({}):", RESEARCH_QUESTION_FILE);
        println!("{}", preview(existing.trim()));
        if !prompter.confirm("Replace with new question?")? {
            println!("Keeping existing research question.");
            return Ok(());
        }
        let question = prompter.ask(&ask)?;
        if question.trim().is_empty() {
            println!("No question entered; keeping existing research question.");
            return Ok(());
        }
        return save_question(session, &question);
    }

    let question = prompter.ask(&ask)?;
    if question.trim().is_empty() {
        println!(
            "No question entered; you can edit {} later.",
            RESEARCH_QUESTION_FILE
        );
        return Ok(());
    }
    save_question(session, &question)
}

fn save_question(session: &Session, question: &str) -> Result<()> {
    session.project.save_research_question(question)?;
    println!(
        "Saved to {}",
        session.project.research_question_path().display()
    );
    session.record(
        EventAction::SaveQuestion,
        json!({ "chars": question.trim().chars().count() }),
    )
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(QUESTION_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
