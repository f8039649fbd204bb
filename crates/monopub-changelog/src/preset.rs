use std::fmt;
use std::str::FromStr;

use crate::error::ChangelogError;

/// A changelog section and the commit types collected under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub title: &'static str,
    pub kinds: &'static [&'static str],
}

const SECTIONS: [Section; 4] = [
    Section {
        title: "Features",
        kinds: &["feat"],
    },
    Section {
        title: "Bug Fixes",
        kinds: &["fix"],
    },
    Section {
        title: "Performance Improvements",
        kinds: &["perf"],
    },
    Section {
        title: "Reverts",
        kinds: &["revert"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangelogPreset {
    #[default]
    Angular,
    ConventionalCommits,
}

impl ChangelogPreset {
    #[must_use]
    pub fn sections(self) -> &'static [Section] {
        &SECTIONS
    }

    #[must_use]
    pub fn breaking_title(self) -> &'static str {
        match self {
            Self::Angular => "BREAKING CHANGES",
            Self::ConventionalCommits => "⚠ BREAKING CHANGES",
        }
    }

    /// Commit types that justify a minor bump on their own.
    #[must_use]
    pub fn is_feature(self, kind: &str) -> bool {
        kind == "feat"
    }
}

impl fmt::Display for ChangelogPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Angular => f.write_str("angular"),
            Self::ConventionalCommits => f.write_str("conventionalcommits"),
        }
    }
}

impl FromStr for ChangelogPreset {
    type Err = ChangelogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("conventional-changelog-").unwrap_or(s);
        match name {
            "angular" => Ok(Self::Angular),
            "conventionalcommits" => Ok(Self::ConventionalCommits),
            _ => Err(ChangelogError::UnknownPreset {
                name: s.to_string(),
            }),
        }
    }
}
