use std::path::Path;

use monopub_project::Workspace;

use crate::Result;
use crate::traits::ProjectProvider;

pub struct FileSystemProjectProvider;

impl FileSystemProjectProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemProjectProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectProvider for FileSystemProjectProvider {
    fn discover_workspace(&self, start_path: &Path) -> Result<Workspace> {
        Ok(monopub_project::discover_workspace(start_path)?)
    }
}
