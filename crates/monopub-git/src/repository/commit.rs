use std::path::Path;

use crate::{CommitInfo, GitError, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns an error if the commit cannot be created.
    pub fn commit(&self, message: &str) -> Result<CommitInfo> {
        let sig = self.inner.signature()?;
        let mut index = self.inner.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.inner.find_tree(tree_id)?;

        let parent = self.inner.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let commit_oid = self
            .inner
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

        Ok(CommitInfo {
            sha: commit_oid.to_string(),
            message: message.to_string(),
        })
    }

    /// Commits reachable from HEAD but not from `since`, oldest first.
    ///
    /// When `dir` is given, only commits touching a file under that
    /// repository-relative directory are returned.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if `since` cannot be resolved.
    pub fn commits_since(&self, since: Option<&str>, dir: Option<&Path>) -> Result<Vec<CommitInfo>> {
        let head = self.head_commit()?;

        let mut revwalk = self.inner.revwalk()?;
        revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::REVERSE)?;
        revwalk.push(head.id())?;

        if let Some(refspec) = since {
            let base = self
                .inner
                .revparse_single(refspec)
                .and_then(|obj| obj.peel_to_commit())
                .map_err(|_| GitError::RefNotFound {
                    refspec: refspec.to_string(),
                })?;
            revwalk.hide(base.id())?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.inner.find_commit(oid?)?;

            if let Some(dir) = dir {
                if !self.commit_touches(&commit, dir)? {
                    continue;
                }
            }

            commits.push(CommitInfo {
                sha: commit.id().to_string(),
                message: commit.message().unwrap_or_default().to_string(),
            });
        }

        Ok(commits)
    }

    fn commit_touches(&self, commit: &git2::Commit<'_>, dir: &Path) -> Result<bool> {
        let tree = commit.tree()?;
        let parent_tree = match commit.parent(0) {
            Ok(parent) => Some(parent.tree()?),
            Err(_) => None,
        };

        let mut opts = git2::DiffOptions::new();
        opts.pathspec(dir);
        let diff = self
            .inner
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

        Ok(diff.stats()?.files_changed() > 0)
    }
}
