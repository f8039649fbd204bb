use crate::Result;

/// Prompts shown while resolving versions. `None` means the user backed out.
pub trait InteractionProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn select_one(&self, message: &str, choices: &[String]) -> Result<Option<usize>>;

    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn confirm(&self, message: &str) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn input(&self, message: &str) -> Result<Option<String>>;
}
