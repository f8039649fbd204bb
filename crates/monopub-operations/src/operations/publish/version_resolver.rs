use std::fmt::Write as _;
use std::path::Path;

use indexmap::IndexMap;
use monopub_core::{BumpKeyword, PackageInfo, ReleaseMode, max_bump};
use monopub_version::{canary_version, increment};
use semver::Version;
use tracing::{debug, info};

use super::options::{PublishOptions, parse_version};
use crate::Result;
use crate::error::OperationError;
use crate::traits::{ConventionalCommits, ConventionalContext, GitProvider, InteractionProvider};
use crate::types::{BumpChoice, ReleasePlan};

const INTERACTIVE_KEYWORDS: [BumpKeyword; 4] = [
    BumpKeyword::Patch,
    BumpKeyword::Minor,
    BumpKeyword::Major,
    BumpKeyword::Prerelease,
];

/// How target versions are chosen, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionStrategy {
    /// One version for every candidate (fixed mode only).
    Explicit(Version),
    /// Ephemeral `<base>-<suffix>.<sha>` versions, never committed.
    Canary { suffix: String, base: BumpKeyword },
    Keyword(BumpKeyword),
    Conventional,
    Interactive,
}

impl VersionStrategy {
    #[must_use]
    pub fn select(options: &PublishOptions) -> Self {
        if let Some(version) = &options.repo_version {
            return Self::Explicit(version.clone());
        }
        if let Some(suffix) = &options.canary {
            return Self::Canary {
                suffix: suffix.clone(),
                base: options.bump.unwrap_or(BumpKeyword::Patch),
            };
        }
        if let Some(keyword) = options.bump {
            return Self::Keyword(keyword);
        }
        if options.conventional_commits {
            return Self::Conventional;
        }
        Self::Interactive
    }

    /// An explicit version is applied without asking.
    #[must_use]
    pub fn needs_confirmation(&self) -> bool {
        !matches!(self, Self::Explicit(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Planned(ReleasePlan),
    Declined,
}

pub struct VersionResolver<'a, G, I, C> {
    git: &'a G,
    interaction: &'a I,
    conventional: &'a C,
    context: ConventionalContext<'a>,
    preid: &'a str,
    yes: bool,
}

impl<'a, G, I, C> VersionResolver<'a, G, I, C>
where
    G: GitProvider,
    I: InteractionProvider,
    C: ConventionalCommits,
{
    pub fn new(
        git: &'a G,
        interaction: &'a I,
        conventional: &'a C,
        context: ConventionalContext<'a>,
        preid: &'a str,
        yes: bool,
    ) -> Self {
        Self {
            git,
            interaction,
            conventional,
            context,
            preid,
            yes,
        }
    }

    fn project_root(&self) -> &Path {
        self.context.project_root
    }

    fn mode(&self) -> ReleaseMode {
        self.context.mode
    }

    /// Computes the release plan for `candidates`.
    ///
    /// `current` is the shared version fixed mode increments from.
    ///
    /// # Errors
    ///
    /// Returns an error if a collaborator fails or a custom version is invalid.
    pub fn resolve(
        &self,
        strategy: &VersionStrategy,
        candidates: &[PackageInfo],
        current: &Version,
    ) -> Result<Resolution> {
        info!(?strategy, mode = %self.mode(), "resolving versions");

        let plan = match strategy {
            VersionStrategy::Explicit(version) => {
                self.uniform(candidates, &BumpChoice::Explicit(version.clone()), current)?
            }
            VersionStrategy::Canary { suffix, base } => self.canary(candidates, suffix, *base)?,
            VersionStrategy::Keyword(keyword) => {
                self.by_choice(candidates, current, |_| Ok(BumpChoice::Keyword(*keyword)))?
            }
            VersionStrategy::Conventional => self.conventional(candidates, current)?,
            VersionStrategy::Interactive => match self.interactive(candidates, current)? {
                Some(plan) => plan,
                None => return Ok(Resolution::Declined),
            },
        };

        if strategy.needs_confirmation() && !self.yes {
            let message = confirmation_message(&plan, candidates);
            if !self.interaction.confirm(&message)? {
                info!("release declined");
                return Ok(Resolution::Declined);
            }
        }

        Ok(Resolution::Planned(plan))
    }

    /// Only an explicit version may sort below the one it replaces.
    fn apply(&self, label: &str, choice: &BumpChoice, current: &Version) -> Result<Version> {
        let next = choice.apply(current, self.preid)?;
        if !matches!(choice, BumpChoice::Explicit(_)) && next < *current {
            return Err(OperationError::VersionRegression {
                package: label.to_string(),
                current: current.clone(),
                next,
            });
        }
        Ok(next)
    }

    fn uniform(
        &self,
        candidates: &[PackageInfo],
        choice: &BumpChoice,
        current: &Version,
    ) -> Result<ReleasePlan> {
        let version = self.apply("the workspace", choice, current)?;
        debug!(%current, %version, "applying shared version");

        Ok(ReleasePlan {
            mode: self.mode(),
            versions: candidates
                .iter()
                .map(|p| (p.name.clone(), version.clone()))
                .collect(),
            repo_version: Some(version),
            meta_suffix: None,
        })
    }

    /// Fixed mode applies one choice to the shared version, independent mode
    /// asks `choose` for every package.
    fn by_choice<F>(
        &self,
        candidates: &[PackageInfo],
        current: &Version,
        mut choose: F,
    ) -> Result<ReleasePlan>
    where
        F: FnMut(&PackageInfo) -> Result<BumpChoice>,
    {
        match self.mode() {
            ReleaseMode::Fixed => {
                let Some(first) = candidates.first() else {
                    return self.uniform(candidates, &BumpChoice::Explicit(current.clone()), current);
                };
                let choice = choose(first)?;
                self.uniform(candidates, &choice, current)
            }
            ReleaseMode::Independent => {
                let mut versions = IndexMap::new();
                for package in candidates {
                    let version = self.apply(&package.name, &choose(package)?, &package.version)?;
                    debug!(package = %package.name, from = %package.version, to = %version, "planned version");
                    versions.insert(package.name.clone(), version);
                }
                Ok(ReleasePlan {
                    mode: ReleaseMode::Independent,
                    versions,
                    repo_version: None,
                    meta_suffix: None,
                })
            }
        }
    }

    fn canary(
        &self,
        candidates: &[PackageInfo],
        suffix: &str,
        base: BumpKeyword,
    ) -> Result<ReleasePlan> {
        let sha = self.git.head_sha(self.project_root())?;
        let mut versions = IndexMap::new();
        for package in candidates {
            let choice = BumpChoice::Canary(canary_version(&package.version, base, suffix, &sha)?);
            let next = self.apply(&package.name, &choice, &package.version)?;
            versions.insert(package.name.clone(), next);
        }

        Ok(ReleasePlan {
            mode: self.mode(),
            versions,
            repo_version: None,
            meta_suffix: Some(suffix.to_string()),
        })
    }

    fn conventional(&self, candidates: &[PackageInfo], current: &Version) -> Result<ReleasePlan> {
        match self.mode() {
            ReleaseMode::Fixed => {
                let mut bumps = Vec::with_capacity(candidates.len());
                for package in candidates {
                    bumps.push(self.conventional.recommend_bump(&self.context, package)?);
                }
                let keyword = max_bump(&bumps).unwrap_or(BumpKeyword::Patch);
                info!(%keyword, "recommended shared bump");
                self.uniform(candidates, &BumpChoice::Keyword(keyword), current)
            }
            ReleaseMode::Independent => self.by_choice(candidates, current, |package| {
                let keyword = self.conventional.recommend_bump(&self.context, package)?;
                debug!(package = %package.name, %keyword, "recommended bump");
                Ok(BumpChoice::Keyword(keyword))
            }),
        }
    }

    fn interactive(
        &self,
        candidates: &[PackageInfo],
        current: &Version,
    ) -> Result<Option<ReleasePlan>> {
        match self.mode() {
            ReleaseMode::Fixed => {
                let Some(choice) = self.prompt("all packages", current)? else {
                    return Ok(None);
                };
                self.uniform(candidates, &choice, current).map(Some)
            }
            ReleaseMode::Independent => {
                let mut versions = IndexMap::new();
                for package in candidates {
                    let Some(choice) = self.prompt(&package.name, &package.version)? else {
                        return Ok(None);
                    };
                    versions.insert(package.name.clone(), self.apply(&package.name, &choice, &package.version)?);
                }
                Ok(Some(ReleasePlan {
                    mode: ReleaseMode::Independent,
                    versions,
                    repo_version: None,
                    meta_suffix: None,
                }))
            }
        }
    }

    fn prompt(&self, label: &str, current: &Version) -> Result<Option<BumpChoice>> {
        let mut choices = Vec::with_capacity(INTERACTIVE_KEYWORDS.len() + 1);
        for keyword in INTERACTIVE_KEYWORDS {
            let next = increment(current, keyword, self.preid)?;
            choices.push(format!("{} ({next})", capitalize(keyword.as_str())));
        }
        choices.push("Custom version".to_string());

        let message = format!("Select a new version for {label} (currently {current})");
        let Some(index) = self.interaction.select_one(&message, &choices)? else {
            return Ok(None);
        };

        if let Some(keyword) = INTERACTIVE_KEYWORDS.get(index) {
            return Ok(Some(BumpChoice::Keyword(*keyword)));
        }

        let Some(raw) = self.interaction.input("Enter a custom version")? else {
            return Ok(None);
        };
        Ok(Some(BumpChoice::Explicit(parse_version(raw.trim())?)))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn confirmation_message(plan: &ReleasePlan, candidates: &[PackageInfo]) -> String {
    let mut message = String::from("Changes:\n");
    for package in candidates {
        if let Some(version) = plan.version_of(&package.name) {
            let private = if package.private { " (private)" } else { "" };
            let _ = writeln!(
                message,
                " - {}: {} => {version}{private}",
                package.name, package.version
            );
        }
    }
    message.push_str("\nAre you sure you want to publish these packages?");
    message
}
