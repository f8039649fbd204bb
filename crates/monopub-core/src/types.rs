use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Semver increment keywords accepted for a non-interactive bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpKeyword {
    Major,
    Minor,
    Patch,
    Premajor,
    Preminor,
    Prepatch,
    Prerelease,
}

impl BumpKeyword {
    pub const ALL: [Self; 7] = [
        Self::Major,
        Self::Minor,
        Self::Patch,
        Self::Premajor,
        Self::Preminor,
        Self::Prepatch,
        Self::Prerelease,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
            Self::Premajor => "premajor",
            Self::Preminor => "preminor",
            Self::Prepatch => "prepatch",
            Self::Prerelease => "prerelease",
        }
    }

    /// Whether the increment produces a prerelease version.
    #[must_use]
    pub fn is_prerelease(self) -> bool {
        matches!(
            self,
            Self::Premajor | Self::Preminor | Self::Prepatch | Self::Prerelease
        )
    }

    /// Ordering used when several recommendations must collapse into one.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Prerelease => 0,
            Self::Prepatch => 1,
            Self::Patch => 2,
            Self::Preminor => 3,
            Self::Minor => 4,
            Self::Premajor => 5,
            Self::Major => 6,
        }
    }

    #[must_use]
    pub fn expected_list() -> String {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for BumpKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BumpKeyword {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| CoreError::InvalidBumpKeyword {
                value: s.to_string(),
            })
    }
}

/// Returns the strongest increment, if any.
#[must_use]
pub fn max_bump(bumps: &[BumpKeyword]) -> Option<BumpKeyword> {
    bumps.iter().copied().max_by_key(|b| b.rank())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseMode {
    /// All packages share one version recorded at the workspace root.
    #[default]
    Fixed,
    Independent,
}

impl ReleaseMode {
    #[must_use]
    pub fn is_independent(self) -> bool {
        self == Self::Independent
    }
}

impl fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => f.write_str("fixed"),
            Self::Independent => f.write_str("independent"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DependencyKind {
    Normal,
    Dev,
    Peer,
}

impl DependencyKind {
    /// Sections whose entries take part in version propagation.
    pub const PROPAGATING: [Self; 2] = [Self::Normal, Self::Dev];

    #[must_use]
    pub fn manifest_key(self) -> &'static str {
        match self {
            Self::Normal => "dependencies",
            Self::Dev => "devDependencies",
            Self::Peer => "peerDependencies",
        }
    }
}

impl FromStr for DependencyKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dependencies" => Ok(Self::Normal),
            "devDependencies" => Ok(Self::Dev),
            "peerDependencies" => Ok(Self::Peer),
            other => Err(CoreError::UnknownDependencySection(other.to_string())),
        }
    }
}

/// A workspace package as captured at invocation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version: Version,
    pub manifest_path: PathBuf,
    pub directory: PathBuf,
    pub private: bool,
    pub dependencies: IndexMap<String, String>,
    pub dev_dependencies: IndexMap<String, String>,
    pub peer_dependencies: IndexMap<String, String>,
    pub lifecycle_scripts: BTreeSet<String>,
}

impl PackageInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, version: Version, directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        Self {
            name: name.into(),
            version,
            manifest_path: directory.join("package.json"),
            directory,
            private: false,
            dependencies: IndexMap::new(),
            dev_dependencies: IndexMap::new(),
            peer_dependencies: IndexMap::new(),
            lifecycle_scripts: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn ranges(&self, kind: DependencyKind) -> &IndexMap<String, String> {
        match kind {
            DependencyKind::Normal => &self.dependencies,
            DependencyKind::Dev => &self.dev_dependencies,
            DependencyKind::Peer => &self.peer_dependencies,
        }
    }

    #[must_use]
    pub fn has_script(&self, name: &str) -> bool {
        self.lifecycle_scripts.contains(name)
    }
}
