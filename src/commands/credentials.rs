//! API key resolution before an agent run.
//!
//! Nothing here touches the process environment. The resolved values are
//! returned as extra variables for the agent child process.

use super::Session;
use super::prompter::Prompter;
use crate::agent::agent_login_active;
use crate::env_file::{API_KEY_VAR, EnvFile};
use crate::error::{AutoscienceError, Result};
use std::collections::BTreeMap;
use tracing::debug;

/// Build the agent's extra environment.
///
/// Entries from the env file are included unless the ambient environment
/// already sets them. When no API key is available and the agent reports
/// no login session, the user is asked for one and may save it.
pub fn agent_environment(
    session: &Session,
    prompter: &mut dyn Prompter,
) -> Result<BTreeMap<String, String>> {
    let mut env_file = EnvFile::load(&session.config.env_file)?;

    let mut extra: BTreeMap<String, String> = env_file
        .entries()
        .iter()
        .filter(|(key, _)| !session.env.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let has_key = session
        .env
        .get(API_KEY_VAR)
        .or_else(|| extra.get(API_KEY_VAR))
        .is_some_and(|value| !value.trim().is_empty());
    if has_key {
        debug!("API key found in environment");
        return Ok(extra);
    }

    if agent_login_active(&session.config.agent) {
        debug!("agent reports an active login session");
        return Ok(extra);
    }

    println!("No {} found and no active agent login session detected.", API_KEY_VAR);
    let entered = prompter.secret("Enter your OpenAI API key (input hidden)")?;
    let entered = entered.trim();
    if entered.is_empty() {
        return Err(AutoscienceError::UserError(format!(
            "No API key provided. Cannot continue without {} or an agent login session.",
            API_KEY_VAR
        )));
    }
    extra.insert(API_KEY_VAR.to_string(), entered.to_string());

    let save_prompt = format!(
        "Save this key to {} for future runs?",
        env_file.path().display()
    );
    if prompter.confirm(&save_prompt)? {
        env_file.save(API_KEY_VAR, entered)?;
        println!("Saved {} to {}", API_KEY_VAR, env_file.path().display());
    }

    Ok(extra)
}
