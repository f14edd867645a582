//! Prompt generation for the research agent.
//!
//! - **Template**: `{variable}` substitution shared with the agent command line
//! - **Composer**: the workflow instruction built from the project layout and
//!   the role fragments in the agents directory
//!
//! Use `{{` to escape and render a literal `{`.

mod composer;
mod template;

pub use composer::compose_prompt;
pub use template::{TemplateError, render_template, vars};
