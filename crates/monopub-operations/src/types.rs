use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use monopub_core::{BumpKeyword, DependencyKind, ReleaseMode};
use monopub_version::{VersionError, increment};
use semver::Version;

/// Target versions computed once by the resolver and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub mode: ReleaseMode,
    /// Released packages in dependency-first order.
    pub versions: IndexMap<String, Version>,
    /// Shared version in fixed mode. Canary plans never carry one.
    pub repo_version: Option<Version>,
    /// Prerelease suffix of a canary release.
    pub meta_suffix: Option<String>,
}

impl ReleasePlan {
    #[must_use]
    pub fn is_canary(&self) -> bool {
        self.meta_suffix.is_some()
    }

    #[must_use]
    pub fn version_of(&self, package: &str) -> Option<&Version> {
        self.versions.get(package)
    }

    #[must_use]
    pub fn highest_version(&self) -> Option<&Version> {
        self.repo_version
            .as_ref()
            .or_else(|| self.versions.values().max())
    }

    /// One `v<version>` tag in fixed mode, one `<name>@<version>` per package otherwise.
    #[must_use]
    pub fn tags(&self) -> Vec<TagDescriptor> {
        match (self.mode, &self.repo_version) {
            (ReleaseMode::Fixed, Some(version)) => vec![TagDescriptor {
                name: format!("v{version}"),
            }],
            _ => self
                .versions
                .iter()
                .map(|(name, version)| TagDescriptor {
                    name: format!("{name}@{version}"),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDescriptor {
    pub name: String,
}

/// A package ready to be handed to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub package: String,
    pub version: Version,
    pub directory: PathBuf,
    pub dist_tag: String,
    pub registry: Option<String>,
}

impl PublishTarget {
    /// `name@version`, the spec used by registry commands.
    #[must_use]
    pub fn spec(&self) -> String {
        format!("{}@{}", self.package, self.version)
    }
}

/// A dependency range rewritten in a dependent's manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeUpdate {
    pub dependent: String,
    pub dependency: String,
    pub kind: DependencyKind,
    pub old_range: String,
    pub new_range: String,
}

/// What a prompt or flag asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpChoice {
    Keyword(BumpKeyword),
    Explicit(Version),
    Canary(Version),
}

impl BumpChoice {
    /// The version this choice produces for a package currently at `current`.
    ///
    /// # Errors
    ///
    /// Returns `VersionError` if `preid` is not a valid prerelease identifier.
    pub fn apply(&self, current: &Version, preid: &str) -> Result<Version, VersionError> {
        match self {
            Self::Keyword(keyword) => increment(current, *keyword, preid),
            Self::Explicit(version) | Self::Canary(version) => Ok(version.clone()),
        }
    }
}

/// Progress of the version-control side of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GitState {
    #[default]
    Idle,
    Staged,
    Committed,
    Tagged,
    Pushed,
    Reverted,
}

impl GitState {
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Staged | Self::Reverted)
                | (Self::Staged, Self::Committed)
                | (Self::Committed, Self::Tagged)
                | (Self::Tagged, Self::Pushed)
        )
    }
}

impl fmt::Display for GitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Staged => "staged",
            Self::Committed => "committed",
            Self::Tagged => "tagged",
            Self::Pushed => "pushed",
            Self::Reverted => "reverted",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct PublishReport {
    pub plan: ReleasePlan,
    pub range_updates: Vec<RangeUpdate>,
    pub written_files: Vec<PathBuf>,
    pub changelogs: Vec<PathBuf>,
    pub git_state: GitState,
    pub commit_sha: Option<String>,
    pub tags: Vec<String>,
    pub published: Vec<PublishTarget>,
}

#[derive(Debug)]
pub enum PublishOutcome {
    NoChanges,
    DryRun(ReleasePlan),
    Declined,
    Completed(PublishReport),
}
