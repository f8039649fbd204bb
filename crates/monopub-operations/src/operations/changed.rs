use std::path::Path;

use monopub_core::{PackageInfo, ReleaseMode};

use super::publish::{ChangeSetDetector, DetectOptions, IgnoreMatcher, release_tag_pattern};
use crate::Result;
use crate::error::OperationError;
use crate::traits::{GitProvider, ProjectProvider};

#[derive(Debug, Clone, Default)]
pub struct ChangedInput {
    pub ignore: Vec<String>,
    pub independent: bool,
}

#[derive(Debug, Clone)]
pub struct ChangedOutput {
    pub last_tag: Option<String>,
    /// Dependency-first.
    pub packages: Vec<PackageInfo>,
}

/// Lists the packages the next release would include, without side effects.
pub struct ChangedOperation<P, G> {
    project_provider: P,
    git_provider: G,
}

impl<P, G> ChangedOperation<P, G>
where
    P: ProjectProvider,
    G: GitProvider,
{
    pub fn new(project_provider: P, git_provider: G) -> Self {
        Self {
            project_provider,
            git_provider,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the workspace cannot be loaded, is not a git
    /// repository, or its history cannot be read.
    pub fn execute(&self, start_path: &Path, input: ChangedInput) -> Result<ChangedOutput> {
        let workspace = self.project_provider.discover_workspace(start_path)?;
        let root = workspace.root.as_path();
        if !self.git_provider.is_initialized(root) {
            return Err(OperationError::NotInitialized(workspace.root.clone()));
        }

        let mode = if input.independent {
            ReleaseMode::Independent
        } else {
            workspace.config.mode()
        };

        let mut patterns = workspace.config.publish().ignore.clone();
        patterns.extend(input.ignore);
        let ignore = IgnoreMatcher::new(&patterns)?;

        let last_tag = if self.git_provider.has_tags(root)? {
            self.git_provider.last_tag(root, release_tag_pattern(mode))?
        } else {
            None
        };

        let packages = ChangeSetDetector::new(&self.git_provider, root).detect(
            &workspace.graph(),
            &DetectOptions {
                last_tag: last_tag.as_deref(),
                ignore: &ignore,
                sweep_prereleases: false,
            },
        )?;

        Ok(ChangedOutput { last_tag, packages })
    }
}
