use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use monopub_core::ReleaseMode;
use tracing::{debug, info};

use crate::Result;
use crate::error::OperationError;
use crate::traits::GitProvider;
use crate::types::{GitState, ReleasePlan, TagDescriptor};

const INDEPENDENT_SUBJECT: &str = "Publish";

/// Expands `%s` to `v<version>` and `%v` to the bare version.
///
/// Without a template, fixed mode commits as `v<version>` and independent
/// mode lists every released `name@version` under a `Publish` subject.
#[must_use]
pub fn format_commit_message(template: Option<&str>, plan: &ReleasePlan) -> String {
    let version = plan
        .highest_version()
        .map(ToString::to_string)
        .unwrap_or_default();
    let expand = |template: &str| {
        template
            .replace("%s", &format!("v{version}"))
            .replace("%v", &version)
    };

    match plan.mode {
        ReleaseMode::Fixed => template.map_or_else(|| format!("v{version}"), expand),
        ReleaseMode::Independent => {
            let mut message = template.map_or_else(|| INDEPENDENT_SUBJECT.to_string(), expand);
            message.push('\n');
            for (name, version) in &plan.versions {
                let _ = write!(message, "\n - {name}@{version}");
            }
            message
        }
    }
}

/// Drives the version-control side of a release through
/// `idle -> staged -> committed -> tagged -> pushed`, or `idle -> reverted`.
pub struct GitReleaseOrchestrator<'a, G> {
    git: &'a G,
    project_root: &'a Path,
    state: GitState,
    commit_sha: Option<String>,
    tags: Vec<String>,
}

impl<'a, G> GitReleaseOrchestrator<'a, G>
where
    G: GitProvider,
{
    pub fn new(git: &'a G, project_root: &'a Path) -> Self {
        Self {
            git,
            project_root,
            state: GitState::Idle,
            commit_sha: None,
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> GitState {
        self.state
    }

    #[must_use]
    pub fn commit_sha(&self) -> Option<&str> {
        self.commit_sha.as_deref()
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    fn ensure(&self, next: GitState) -> Result<()> {
        if self.state.can_transition_to(next) {
            Ok(())
        } else {
            Err(OperationError::InvalidTransition {
                from: self.state,
                to: next,
            })
        }
    }

    fn advance(&mut self, next: GitState) {
        debug!(from = %self.state, to = %next, "git release transition");
        self.state = next;
    }

    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `idle`, or the staging failure.
    pub fn stage(&mut self, paths: &[PathBuf]) -> Result<()> {
        self.ensure(GitState::Staged)?;
        let paths: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
        self.git.stage_files(self.project_root, &paths)?;
        info!(files = paths.len(), "staged release files");
        self.advance(GitState::Staged);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `staged`, or the commit failure.
    pub fn commit(&mut self, message: &str) -> Result<&str> {
        self.ensure(GitState::Committed)?;
        let commit = self.git.commit(self.project_root, message)?;
        info!(sha = %commit.sha, "created release commit");
        self.advance(GitState::Committed);
        Ok(self.commit_sha.insert(commit.sha).as_str())
    }

    /// Creates annotated tags, each using its own name as the message.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `committed`, or the first tag failure.
    pub fn tag(&mut self, tags: &[TagDescriptor]) -> Result<&[String]> {
        self.ensure(GitState::Tagged)?;
        for tag in tags {
            let created = self.git.create_tag(self.project_root, &tag.name, &tag.name)?;
            info!(tag = %created.name, "created tag");
            self.tags.push(created.name);
        }
        self.advance(GitState::Tagged);
        Ok(&self.tags)
    }

    /// Pushes `branch` and every tag created by [`Self::tag`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `tagged`, or the push failure.
    pub fn push(&mut self, remote: &str, branch: &str) -> Result<()> {
        self.ensure(GitState::Pushed)?;
        self.git
            .push_with_tags(self.project_root, remote, branch, &self.tags)?;
        info!(remote, branch, tags = self.tags.len(), "pushed release");
        self.advance(GitState::Pushed);
        Ok(())
    }

    /// Discards working-tree edits to every path matching `pathspecs`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside `idle`, or the checkout failure.
    pub fn revert(&mut self, pathspecs: &[String]) -> Result<()> {
        self.ensure(GitState::Reverted)?;
        for pathspec in pathspecs {
            self.git.revert_paths(self.project_root, pathspec)?;
        }
        info!(pathspecs = ?pathspecs, "reverted transient manifest edits");
        self.advance(GitState::Reverted);
        Ok(())
    }
}
