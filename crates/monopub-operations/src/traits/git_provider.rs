use std::path::Path;

use monopub_git::{CommitInfo, FileChange, TagInfo};

use crate::Result;

pub trait GitProvider: Send + Sync {
    fn is_initialized(&self, project_root: &Path) -> bool;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or HEAD is detached.
    fn current_branch(&self, project_root: &Path) -> Result<String>;

    /// Full hash of the HEAD commit.
    ///
    /// # Errors
    ///
    /// Returns an error if HEAD cannot be resolved.
    fn head_sha(&self, project_root: &Path) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn has_tags(&self, project_root: &Path) -> Result<bool>;

    /// Nearest tag reachable from HEAD matching the glob `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or described.
    fn last_tag(&self, project_root: &Path, pattern: &str) -> Result<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if `tag` cannot be resolved or the diff fails.
    fn changed_files_since(&self, project_root: &Path, tag: &str, dir: &Path)
    -> Result<Vec<FileChange>>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or status check fails.
    fn is_working_tree_clean(&self, project_root: &Path) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if staging any of the files fails.
    fn stage_files(&self, project_root: &Path, paths: &[&Path]) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the commit cannot be created.
    fn commit(&self, project_root: &Path, message: &str) -> Result<CommitInfo>;

    /// # Errors
    ///
    /// Returns an error if the tag cannot be created or already exists.
    fn create_tag(&self, project_root: &Path, tag_name: &str, message: &str) -> Result<TagInfo>;

    /// Restores tracked files matching `pattern` to their committed content.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout fails.
    fn revert_paths(&self, project_root: &Path, pattern: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the remote is missing or rejects any reference.
    fn push_with_tags(
        &self,
        project_root: &Path,
        remote: &str,
        branch: &str,
        tags: &[String],
    ) -> Result<()>;
}
