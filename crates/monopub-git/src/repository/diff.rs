use std::path::{Path, PathBuf};

use crate::{FileChange, FileStatus, GitError, Result};

use super::Repository;

impl Repository {
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if either base or head cannot be resolved.
    pub fn changed_files(&self, base: Option<&str>, head: &str) -> Result<Vec<FileChange>> {
        let head_tree = self.resolve_tree(head)?;

        let base_tree = match base {
            Some(refspec) => Some(self.resolve_tree(refspec)?),
            None => None,
        };

        let mut diff = self
            .inner
            .diff_tree_to_tree(base_tree.as_ref(), Some(&head_tree), None)?;

        let mut find_opts = git2::DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))?;

        let mut changes = Vec::new();

        for delta in diff.deltas() {
            let status = match delta.status() {
                git2::Delta::Added => FileStatus::Added,
                git2::Delta::Deleted => FileStatus::Deleted,
                git2::Delta::Modified => FileStatus::Modified,
                git2::Delta::Renamed => FileStatus::Renamed,
                git2::Delta::Copied => FileStatus::Copied,
                _ => continue,
            };

            let path = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(PathBuf::from)
                .ok_or(GitError::MissingDeltaPath)?;

            let mut change = FileChange::new(path, status);
            if status == FileStatus::Renamed {
                if let Some(old_path) = delta.old_file().path() {
                    change = change.with_old_path(old_path.to_path_buf());
                }
            }

            changes.push(change);
        }

        Ok(changes)
    }

    /// Files changed between `tag` and HEAD that live under `dir`.
    ///
    /// `dir` may be absolute or relative to the work tree root.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RefNotFound`] if the tag cannot be resolved.
    pub fn changed_files_since(&self, tag: &str, dir: &Path) -> Result<Vec<FileChange>> {
        let relative = self.to_relative_path(dir);
        let whole_tree = relative.as_os_str().is_empty() || relative == Path::new(".");
        let changes = self.changed_files(Some(tag), "HEAD")?;

        Ok(changes
            .into_iter()
            .filter(|change| whole_tree || change.touches(&relative))
            .collect())
    }

    fn resolve_tree(&self, refspec: &str) -> Result<git2::Tree<'_>> {
        let obj = self
            .inner
            .revparse_single(refspec)
            .map_err(|_| GitError::RefNotFound {
                refspec: refspec.to_string(),
            })?;

        obj.peel_to_tree().map_err(|_| GitError::RefNotFound {
            refspec: refspec.to_string(),
        })
    }
}
