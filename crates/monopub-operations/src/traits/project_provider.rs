use std::path::Path;

use monopub_project::Workspace;

use crate::Result;

pub trait ProjectProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if no workspace is found or it cannot be loaded.
    fn discover_workspace(&self, start_path: &Path) -> Result<Workspace>;
}
