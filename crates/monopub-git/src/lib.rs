mod error;
mod repository;
mod types;

pub use error::GitError;
pub use repository::Repository;
pub use types::{CommitInfo, FileChange, FileStatus, TagInfo};

use std::path::Path;

pub type Result<T> = std::result::Result<T, GitError>;

/// Whether `path` sits inside a git work tree.
#[must_use]
pub fn is_initialized(path: &Path) -> bool {
    Repository::open(path).is_ok()
}

/// # Errors
///
/// Returns an error if the path is not a git repository or if HEAD is detached.
pub fn current_branch(path: &Path) -> Result<String> {
    Repository::open(path)?.current_branch()
}
