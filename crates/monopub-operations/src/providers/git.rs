use std::path::Path;

use monopub_git::{CommitInfo, FileChange, Repository, TagInfo};

use crate::Result;
use crate::traits::GitProvider;

pub struct Git2Provider;

impl Git2Provider {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Git2Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for Git2Provider {
    fn is_initialized(&self, project_root: &Path) -> bool {
        monopub_git::is_initialized(project_root)
    }

    fn current_branch(&self, project_root: &Path) -> Result<String> {
        Ok(monopub_git::current_branch(project_root)?)
    }

    fn head_sha(&self, project_root: &Path) -> Result<String> {
        let repo = Repository::open(project_root)?;
        Ok(repo.head_sha()?)
    }

    fn has_tags(&self, project_root: &Path) -> Result<bool> {
        let repo = Repository::open(project_root)?;
        Ok(repo.has_tags()?)
    }

    fn last_tag(&self, project_root: &Path, pattern: &str) -> Result<Option<String>> {
        let repo = Repository::open(project_root)?;
        Ok(repo.last_tag(pattern)?)
    }

    fn changed_files_since(
        &self,
        project_root: &Path,
        tag: &str,
        dir: &Path,
    ) -> Result<Vec<FileChange>> {
        let repo = Repository::open(project_root)?;
        Ok(repo.changed_files_since(tag, dir)?)
    }

    fn is_working_tree_clean(&self, project_root: &Path) -> Result<bool> {
        let repo = Repository::open(project_root)?;
        Ok(repo.is_working_tree_clean()?)
    }

    fn stage_files(&self, project_root: &Path, paths: &[&Path]) -> Result<()> {
        let repo = Repository::open(project_root)?;
        Ok(repo.stage_files(paths)?)
    }

    fn commit(&self, project_root: &Path, message: &str) -> Result<CommitInfo> {
        let repo = Repository::open(project_root)?;
        Ok(repo.commit(message)?)
    }

    fn create_tag(&self, project_root: &Path, tag_name: &str, message: &str) -> Result<TagInfo> {
        let repo = Repository::open(project_root)?;
        Ok(repo.create_tag(tag_name, message)?)
    }

    fn revert_paths(&self, project_root: &Path, pattern: &str) -> Result<()> {
        let repo = Repository::open(project_root)?;
        Ok(repo.revert_paths(pattern)?)
    }

    fn push_with_tags(
        &self,
        project_root: &Path,
        remote: &str,
        branch: &str,
        tags: &[String],
    ) -> Result<()> {
        let repo = Repository::open(project_root)?;
        Ok(repo.push_with_tags(remote, branch, tags)?)
    }
}
