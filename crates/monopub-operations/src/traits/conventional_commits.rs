use std::path::{Path, PathBuf};

use monopub_changelog::ChangelogPreset;
use monopub_core::{BumpKeyword, PackageInfo, ReleaseMode};
use semver::Version;

use crate::Result;

/// Settings shared by every conventional-commits call in one run.
#[derive(Debug, Clone, Copy)]
pub struct ConventionalContext<'a> {
    pub project_root: &'a Path,
    pub preset: ChangelogPreset,
    pub mode: ReleaseMode,
}

/// Bump recommendation and changelog generation driven by commit messages.
pub trait ConventionalCommits: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the commit history cannot be read.
    fn recommend_bump(
        &self,
        context: &ConventionalContext<'_>,
        package: &PackageInfo,
    ) -> Result<BumpKeyword>;

    /// Prepends a release entry to the package's changelog and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if history cannot be read or the changelog cannot be written.
    fn update_changelog(
        &self,
        context: &ConventionalContext<'_>,
        package: &PackageInfo,
        version: &Version,
    ) -> Result<PathBuf>;

    /// Prepends a release entry to the workspace-root changelog and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if history cannot be read or the changelog cannot be written.
    fn update_root_changelog(
        &self,
        context: &ConventionalContext<'_>,
        version: &Version,
    ) -> Result<PathBuf>;
}
