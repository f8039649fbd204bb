use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git operation failed")]
    Git(#[from] git2::Error),

    #[error("not a git repository: '{path}'")]
    NotARepository { path: PathBuf },

    #[error("failed to resolve reference '{refspec}'")]
    RefNotFound { refspec: String },

    #[error("HEAD is detached, not on a branch")]
    DetachedHead,

    #[error("repository has no commits yet")]
    NoCommits,

    #[error("diff delta has no file path")]
    MissingDeltaPath,

    #[error("remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("remote rejected '{refname}': {message}")]
    PushRejected { refname: String, message: String },
}
