use dialoguer::{Confirm, Input, Select};
use monopub_operations::traits::InteractionProvider;
use monopub_operations::{OperationError, Result};
use tracing::debug;

use crate::environment::non_interactive_reason;

/// Prompts on the controlling terminal. Fails with
/// `OperationError::InteractionRequired` when there is none.
pub struct TerminalInteractionProvider;

impl TerminalInteractionProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalInteractionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionProvider for TerminalInteractionProvider {
    fn select_one(&self, message: &str, choices: &[String]) -> Result<Option<usize>> {
        require_terminal()?;

        Select::new()
            .with_prompt(message)
            .items(choices)
            .default(0)
            .interact_opt()
            .map_err(dialoguer_error)
    }

    fn confirm(&self, message: &str) -> Result<bool> {
        require_terminal()?;

        let answer = Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact_opt()
            .map_err(dialoguer_error)?;
        Ok(answer.unwrap_or(false))
    }

    fn input(&self, message: &str) -> Result<Option<String>> {
        require_terminal()?;

        let value: String = Input::new()
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .map_err(dialoguer_error)?;
        let value = value.trim();
        Ok((!value.is_empty()).then(|| value.to_string()))
    }
}

fn require_terminal() -> Result<()> {
    match non_interactive_reason() {
        None => Ok(()),
        Some(reason) => {
            debug!(?reason, "prompt refused");
            Err(OperationError::InteractionRequired)
        }
    }
}

fn dialoguer_error(e: dialoguer::Error) -> OperationError {
    match e {
        dialoguer::Error::IO(io_err) => OperationError::Io(io_err),
    }
}
