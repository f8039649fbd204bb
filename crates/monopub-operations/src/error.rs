use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::GitState;

/// Registry call that failed, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryAction {
    Publish,
    ListDistTags,
    AddDistTag,
    RemoveDistTag,
}

impl fmt::Display for RegistryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Publish => f.write_str("publish"),
            Self::ListDistTags => f.write_str("dist-tag ls"),
            Self::AddDistTag => f.write_str("dist-tag add"),
            Self::RemoveDistTag => f.write_str("dist-tag rm"),
        }
    }
}

/// Malformed option values. Always raised before any side effect.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Keyword(#[from] monopub_core::CoreError),

    #[error("invalid version '{value}'")]
    InvalidVersion {
        value: String,
        #[source]
        source: semver::Error,
    },

    #[error("an explicit repository version cannot be used in independent mode")]
    RepoVersionInIndependentMode,

    #[error("canary releases cannot be combined with an explicit repository version")]
    RepoVersionWithCanary,

    #[error("invalid allowed branch pattern '{pattern}'")]
    BranchPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("invalid ignore pattern '{pattern}'")]
    IgnorePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("publish concurrency must be at least 1")]
    ZeroConcurrency,

    #[error(transparent)]
    Preset(#[from] monopub_changelog::ChangelogError),

    #[error("invalid prerelease identifier '{value}'")]
    InvalidPreid { value: String },
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("branch '{branch}' is restricted from publishing (allowed: {allowed})")]
    BranchRestricted { branch: String, allowed: String },

    #[error("version control operation failed")]
    VersionControl(#[from] monopub_git::GitError),

    #[error("registry {action} failed for '{package}': {message}")]
    Registry {
        package: String,
        action: RegistryAction,
        message: String,
    },

    #[error("lifecycle script '{script}' failed for '{package}' ({})", exit_description(*code))]
    LifecycleScript {
        package: String,
        script: String,
        code: Option<i32>,
    },

    #[error("working tree has uncommitted changes; commit or stash them, or use --skip-git")]
    DirtyWorkingTree,

    #[error("'{0}' is not inside a git repository")]
    NotInitialized(PathBuf),

    #[error("cannot move git release from {from} to {to}")]
    InvalidTransition { from: GitState, to: GitState },

    #[error(transparent)]
    Project(#[from] monopub_project::ProjectError),

    #[error(transparent)]
    Manifest(#[from] monopub_manifest::ManifestError),

    #[error(transparent)]
    Changelog(#[from] monopub_changelog::ChangelogError),

    #[error("version calculation failed")]
    Version(#[from] monopub_version::VersionError),

    #[error("failed to build publish worker pool")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to run '{program}'")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("version of {package} would move backwards from {current} to {next}")]
    VersionRegression {
        package: String,
        current: semver::Version,
        next: semver::Version,
    },

    #[error("interaction required but no terminal is available")]
    InteractionRequired,

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("operation cancelled")]
    Cancelled,

    #[error("no packages found in workspace at '{0}'")]
    EmptyWorkspace(PathBuf),
}

pub type Result<T> = std::result::Result<T, OperationError>;

fn exit_description(code: Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exit code {code}"),
    )
}
