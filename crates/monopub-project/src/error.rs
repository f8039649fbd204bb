use std::path::PathBuf;

use monopub_manifest::ManifestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("no monopub.json found traversing from '{start_dir}'")]
    NotFound { start_dir: PathBuf },

    #[error("failed to read configuration at '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration at '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("invalid package glob '{pattern}'")]
    GlobPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to expand package glob")]
    GlobWalk(#[from] glob::GlobError),

    #[error("invalid root version '{version}'")]
    InvalidRootVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("package '{name}' is defined in both '{first}' and '{second}'")]
    DuplicatePackage {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}
