use crate::Result;

use super::Repository;

impl Repository {
    /// Restores every tracked file matching the pathspec `pattern` to its HEAD content.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout fails.
    pub fn revert_paths(&self, pattern: &str) -> Result<()> {
        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.force().path(pattern);

        self.inner.checkout_head(Some(&mut checkout))?;
        Ok(())
    }
}
