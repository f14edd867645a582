//! Assembly of the instruction text handed to the agent.
//!
//! Normal runs and clear-and-rerun runs both go through [`compose_prompt`],
//! so the agent always sees the same workflow contract.

use super::template::{TemplateError, render_template, vars};
use crate::error::{AutoscienceError, Result};
use crate::project::Project;
use std::fs;
use std::path::Path;

/// Role fragments read from the agents directory: (template variable, file name).
pub const FRAGMENTS: &[(&str, &str)] = &[
    ("orchestrator_prompt", "orchestrator.md"),
    ("data_architect_prompt", "data_architect.md"),
    ("variable_selector_prompt", "variable_selector.md"),
    ("analyst_visualizer_prompt", "analyst_and_visualizer.md"),
    ("scientific_writer_prompt", "scientific_writer.md"),
];

/// Token the agent prints once every stage is complete.
pub const DONE_MARKER: &str = "<<DONE>>";

const WORKFLOW_TEMPLATE: &str = "\
You are an AI research assistant running the AutoScience multi-agent workflow for this project.

Run scope (must be used consistently for every agent and artifact):
- Project root: {project_root}
- Research question: {research_question}
- Data directory: {data_dir}
- Analysis scripts directory: {analysis_dir}
- Visualization scripts directory: {visualization_dir}
- Reporting directory: {reporting_dir}
- Agent instruction directory: {agents_dir}

Workflow contract:
- Use the agent prompts below as the authoritative, exact instructions for each role.
- Orchestrate the pipeline by following the Orchestrator prompt state machine.
- Keep all paths and artifacts under this project root.
- Do not use artifacts from any other project.
- Execute all pipeline stages in order; do not skip any stage.

Required stage-by-stage execution checklist (must complete in order):
1) Parsing Data
   - Ensure data parsing/inspection artifacts and schema docs exist in data/.
2) Selecting Variables
   - Write analysis_scripts/selected_variables.md from the research question + schema.
3) Build Focused Dataset
   - Create a focused CSV containing only selected variables.
   - Name it [dataset_name]_focused.csv (dataset stem + \"_focused.csv\"), under data/.
4) Running Analysis
   - Write and execute analysis scripts in analysis_scripts/.
   - Produce analysis outputs and run logs (stdout/stderr).
5) Visualizing
   - Write and execute visualization scripts in visualization_scripts/.
   - Produce figure outputs in stable paths plus run logs.
6) Reporting
   - Write reporting/report.md.
   - Write reporting/{notebook_name}.
   - Notebook must include successful analysis/visualization code with required commentary coverage.

Record progress in {state_file} using exactly one of: {phase_tokens}.

Completion rule:
- You may output {done_marker} only after all checklist items are complete and artifacts are present on disk.

Notebook filename requirement:
- {notebook_name}

Global quality gate (must pass before writing {done_marker}):
- The notebook must provide commentary coverage for logical analysis units:
  - every non-trivial function has commentary,
  - complex functions are split into commentary across smaller logical steps,
  - basic/obvious helper functions may omit commentary.
- If any required commentary coverage is missing, do not finish; fix the notebook first.

=== AGENT PROMPT: ORCHESTRATOR ===
{orchestrator_prompt}

=== AGENT PROMPT: DATA ARCHITECT ===
{data_architect_prompt}

=== AGENT PROMPT: VARIABLE SELECTOR ===
{variable_selector_prompt}

=== AGENT PROMPT: ANALYST AND VISUALIZER ===
{analyst_visualizer_prompt}

=== AGENT PROMPT: SCIENTIFIC WRITER ===
{scientific_writer_prompt}

When everything is complete, write {done_marker}";

/// Build the full instruction for `project` using fragments from `agents_dir`.
pub fn compose_prompt(project: &Project, agents_dir: &Path) -> Result<String> {
    let agents_dir = std::path::absolute(agents_dir).map_err(|e| {
        AutoscienceError::UserError(format!(
            "failed to resolve agents directory '{}': {}",
            agents_dir.display(),
            e
        ))
    })?;

    let phase_tokens = crate::state::Phase::ALL
        .iter()
        .map(|p| format!("\"{}\"", p))
        .collect::<Vec<_>>()
        .join(", ");

    let mut variables = vars([
        ("project_root", project.path().display().to_string()),
        (
            "research_question",
            project.research_question_path().display().to_string(),
        ),
        ("data_dir", project.data_path().display().to_string()),
        (
            "analysis_dir",
            project.analysis_scripts_path().display().to_string(),
        ),
        (
            "visualization_dir",
            project.visualization_scripts_path().display().to_string(),
        ),
        ("reporting_dir", project.reporting_path().display().to_string()),
        ("agents_dir", agents_dir.display().to_string()),
        ("notebook_name", project.notebook_name()),
        (
            "state_file",
            project.pipeline_state_path().display().to_string(),
        ),
        ("phase_tokens", phase_tokens),
        ("done_marker", DONE_MARKER.to_string()),
    ]);

    for (variable, file) in FRAGMENTS {
        variables.insert(variable.to_string(), read_fragment(&agents_dir, file)?);
    }

    render_template(WORKFLOW_TEMPLATE, &variables).map_err(|e: TemplateError| {
        AutoscienceError::UserError(format!("failed to render agent prompt: {}", e))
    })
}

fn read_fragment(agents_dir: &Path, file: &str) -> Result<String> {
    let path = agents_dir.join(file);
    let content = fs::read_to_string(&path).map_err(|e| {
        AutoscienceError::UserError(format!(
            "failed to read agent instructions '{}': {}\n\
             Fix: set `agents_dir` in autoscience.yaml to the directory containing {}.",
            path.display(),
            e,
            FRAGMENTS
                .iter()
                .map(|(_, f)| *f)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;
    Ok(content.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{create_ready_project, write_agent_fragments};

    #[test]
    fn prompt_includes_run_scope_paths() {
        let (temp_dir, project) = create_ready_project("rain");
        let agents = temp_dir.path().join("agents");
        write_agent_fragments(&agents);

        let prompt = compose_prompt(&project, &agents).unwrap();

        assert!(prompt.contains(&format!("- Project root: {}", project.path().display())));
        assert!(prompt.contains(&format!(
            "- Data directory: {}",
            project.data_path().display()
        )));
        assert!(prompt.contains(&format!(
            "- Agent instruction directory: {}",
            agents.display()
        )));
        assert!(prompt.contains("reporting/rain_reproducable.ipynb"));
        assert!(prompt.contains("\"Parsing Data\", \"Running Analysis\""));
        assert!(prompt.ends_with("When everything is complete, write <<DONE>>"));
    }

    #[test]
    fn fragments_are_trimmed_and_in_role_order() {
        let (temp_dir, project) = create_ready_project("rain");
        let agents = temp_dir.path().join("agents");
        write_agent_fragments(&agents);

        let prompt = compose_prompt(&project, &agents).unwrap();

        assert!(prompt.contains("=== AGENT PROMPT: ORCHESTRATOR ===\nORCHESTRATOR BODY\n\n"));
        let order: Vec<_> = [
            "ORCHESTRATOR BODY",
            "DATA ARCHITECT BODY",
            "VARIABLE SELECTOR BODY",
            "ANALYST BODY",
            "WRITER BODY",
        ]
        .iter()
        .map(|body| prompt.find(body).unwrap())
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn braces_in_fragments_are_inserted_verbatim() {
        let (temp_dir, project) = create_ready_project("rain");
        let agents = temp_dir.path().join("agents");
        write_agent_fragments(&agents);
        fs::write(agents.join("scientific_writer.md"), "Use {figure_path} tokens").unwrap();

        let prompt = compose_prompt(&project, &agents).unwrap();

        assert!(prompt.contains("Use {figure_path} tokens"));
    }

    #[test]
    fn missing_fragment_is_error_naming_file() {
        let (temp_dir, project) = create_ready_project("rain");
        let agents = temp_dir.path().join("agents");
        write_agent_fragments(&agents);
        fs::remove_file(agents.join("variable_selector.md")).unwrap();

        let err = compose_prompt(&project, &agents).unwrap_err();

        assert!(matches!(err, AutoscienceError::UserError(_)));
        assert!(err.to_string().contains("variable_selector.md"));
    }
}
