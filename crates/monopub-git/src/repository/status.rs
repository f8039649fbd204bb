use crate::{GitError, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::DetachedHead`] if HEAD is not on a branch.
    pub fn current_branch(&self) -> Result<String> {
        let head = self.inner.head().map_err(|e| {
            if e.code() == git2::ErrorCode::UnbornBranch {
                GitError::NoCommits
            } else {
                GitError::Git(e)
            }
        })?;

        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }

        head.shorthand()
            .map(String::from)
            .ok_or(GitError::DetachedHead)
    }

    /// # Errors
    ///
    /// Returns an error if the git status operation fails.
    pub fn is_working_tree_clean(&self) -> Result<bool> {
        let statuses = self.inner.statuses(Some(
            git2::StatusOptions::new()
                .include_untracked(true)
                .recurse_untracked_dirs(true),
        ))?;

        Ok(statuses.is_empty())
    }

    /// # Errors
    ///
    /// Returns [`GitError::NoCommits`] on an unborn branch.
    pub fn head_sha(&self) -> Result<String> {
        Ok(self.head_commit()?.id().to_string())
    }
}
