use std::path::{Path, PathBuf};

use chrono::Local;
use monopub_changelog::{
    CHANGELOG_FILE, Changelog, ConventionalCommit, ReleaseNotes, format_release, recommend_bump,
};
use monopub_core::{BumpKeyword, PackageInfo, ReleaseMode};
use monopub_git::Repository;
use semver::Version;
use tracing::debug;

use crate::Result;
use crate::traits::{ConventionalCommits, ConventionalContext};

/// Reads commit history with git2 and renders changelogs with `monopub-changelog`.
pub struct ConventionalChangelogProvider;

impl ConventionalChangelogProvider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn package_commits(
        context: &ConventionalContext<'_>,
        package: &PackageInfo,
    ) -> Result<Vec<ConventionalCommit>> {
        let repo = Repository::open(context.project_root)?;
        let pattern = match context.mode {
            ReleaseMode::Fixed => "v*".to_string(),
            ReleaseMode::Independent => format!("{}@*", package.name),
        };
        let since = repo.last_tag(&pattern)?;
        let dir = repo.to_relative_path(&package.directory);

        let commits = repo.commits_since(since.as_deref(), Some(&dir))?;
        debug!(
            package = %package.name,
            since = since.as_deref().unwrap_or("<root>"),
            count = commits.len(),
            "collected package commits"
        );
        Ok(parse_all(&commits))
    }

    fn write_release(
        path: &Path,
        notes: &ReleaseNotes,
        context: &ConventionalContext<'_>,
    ) -> Result<PathBuf> {
        let mut changelog = Changelog::load_or_new(path)?;
        changelog.add_release(&format_release(notes, context.preset));
        changelog.write_to_file(path)?;
        Ok(path.to_path_buf())
    }
}

impl Default for ConventionalChangelogProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConventionalCommits for ConventionalChangelogProvider {
    fn recommend_bump(
        &self,
        context: &ConventionalContext<'_>,
        package: &PackageInfo,
    ) -> Result<BumpKeyword> {
        let commits = Self::package_commits(context, package)?;
        Ok(recommend_bump(&commits, &package.version, context.preset))
    }

    fn update_changelog(
        &self,
        context: &ConventionalContext<'_>,
        package: &PackageInfo,
        version: &Version,
    ) -> Result<PathBuf> {
        let notes = ReleaseNotes {
            version: version.clone(),
            date: Local::now().date_naive(),
            package: Some(package.name.clone()),
            commits: Self::package_commits(context, package)?,
        };
        Self::write_release(&package.directory.join(CHANGELOG_FILE), &notes, context)
    }

    fn update_root_changelog(
        &self,
        context: &ConventionalContext<'_>,
        version: &Version,
    ) -> Result<PathBuf> {
        let repo = Repository::open(context.project_root)?;
        let since = repo.last_tag("v*")?;
        let commits = repo.commits_since(since.as_deref(), None)?;

        let notes = ReleaseNotes {
            version: version.clone(),
            date: Local::now().date_naive(),
            package: None,
            commits: parse_all(&commits),
        };
        Self::write_release(&context.project_root.join(CHANGELOG_FILE), &notes, context)
    }
}

fn parse_all(commits: &[monopub_git::CommitInfo]) -> Vec<ConventionalCommit> {
    commits
        .iter()
        .filter_map(|c| ConventionalCommit::parse(&c.sha, &c.message))
        .collect()
}
