use std::path::Path;

use monopub_core::ReleaseMode;
use semver::Version;
use serde::Deserialize;

use crate::error::ProjectError;

const INDEPENDENT_MARKER: &str = "independent";

/// `allowBranch` accepts either one pattern or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AllowBranch {
    One(String),
    Many(Vec<String>),
}

impl AllowBranch {
    #[must_use]
    pub fn patterns(&self) -> Vec<String> {
        match self {
            Self::One(pattern) => vec![pattern.clone()],
            Self::Many(patterns) => patterns.clone(),
        }
    }
}

/// Persisted defaults for `monopub publish`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublishConfig {
    pub allow_branch: Option<AllowBranch>,
    pub message: Option<String>,
    pub exact: bool,
    pub conventional_commits: bool,
    pub changelog_preset: Option<String>,
    pub git_remote: Option<String>,
    pub npm_tag: Option<String>,
    pub pre_dist_tag: Option<String>,
    pub registry: Option<String>,
    pub temp_tag: bool,
    pub ignore: Vec<String>,
    pub preid: Option<String>,
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
struct CommandConfig {
    publish: PublishConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
struct RawRootConfig {
    version: Option<String>,
    packages: Option<Vec<String>>,
    command: CommandConfig,
}

/// Parsed `monopub.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootConfig {
    mode: ReleaseMode,
    version: Option<Version>,
    packages: Vec<String>,
    publish: PublishConfig,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            mode: ReleaseMode::Fixed,
            version: None,
            packages: vec![crate::DEFAULT_PACKAGE_GLOB.to_string()],
            publish: PublishConfig::default(),
        }
    }
}

impl RootConfig {
    #[must_use]
    pub fn mode(&self) -> ReleaseMode {
        self.mode
    }

    /// The shared version in fixed mode; `None` in independent mode.
    #[must_use]
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    #[must_use]
    pub fn package_globs(&self) -> &[String] {
        &self.packages
    }

    #[must_use]
    pub fn publish(&self) -> &PublishConfig {
        &self.publish
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_publish(mut self, publish: PublishConfig) -> Self {
        self.publish = publish;
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_mode(mut self, mode: ReleaseMode, version: Option<Version>) -> Self {
        self.mode = mode;
        self.version = version;
        self
    }
}

/// # Errors
///
/// Returns `ProjectError::ConfigParse` for malformed JSON and
/// `ProjectError::InvalidRootVersion` when `version` is neither semver nor `"independent"`.
pub fn parse_root_config(path: &Path, content: &str) -> Result<RootConfig, ProjectError> {
    let raw: RawRootConfig =
        serde_json::from_str(content).map_err(|source| ProjectError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    let (mode, version) = match raw.version.as_deref() {
        Some(INDEPENDENT_MARKER) => (ReleaseMode::Independent, None),
        Some(raw_version) => {
            let version =
                Version::parse(raw_version).map_err(|source| ProjectError::InvalidRootVersion {
                    version: raw_version.to_string(),
                    source,
                })?;
            (ReleaseMode::Fixed, Some(version))
        }
        None => (ReleaseMode::Fixed, None),
    };

    let packages = match raw.packages {
        Some(globs) if !globs.is_empty() => globs,
        _ => vec![crate::DEFAULT_PACKAGE_GLOB.to_string()],
    };

    Ok(RootConfig {
        mode,
        version,
        packages,
        publish: raw.command.publish,
    })
}
