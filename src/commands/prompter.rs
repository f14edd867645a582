//! Interactive input used by the run flow.

use crate::error::{AutoscienceError, Result};
use dialoguer::{Confirm, Input, Password};

/// Source of answers for interactive prompts.
pub trait Prompter {
    /// Free-form line; may be empty.
    fn ask(&mut self, prompt: &str) -> Result<String>;

    /// Yes/no question defaulting to "no".
    fn confirm(&mut self, prompt: &str) -> Result<bool>;

    /// Wait until the user acknowledges `prompt`.
    fn pause(&mut self, prompt: &str) -> Result<()>;

    /// Line read without echo.
    fn secret(&mut self, prompt: &str) -> Result<String>;
}

/// Terminal prompts via dialoguer.
#[derive(Debug, Default)]
pub struct ConsolePrompter;

fn input_error(e: dialoguer::Error) -> AutoscienceError {
    AutoscienceError::UserError(format!("failed to read input: {}", e))
}

impl Prompter for ConsolePrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(input_error)
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(input_error)
    }

    fn pause(&mut self, prompt: &str) -> Result<()> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map(|_| ())
            .map_err(input_error)
    }

    fn secret(&mut self, prompt: &str) -> Result<String> {
        Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .map_err(input_error)
    }
}
