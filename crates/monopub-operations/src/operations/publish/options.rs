use globset::{Glob, GlobSet, GlobSetBuilder};
use monopub_changelog::ChangelogPreset;
use monopub_core::{BumpKeyword, ReleaseMode};
use monopub_project::RootConfig;
use semver::{Prerelease, Version};

use super::branch_gate::BranchGate;
use crate::error::ValidationError;

pub const DEFAULT_GIT_REMOTE: &str = "origin";
pub const DEFAULT_PREID: &str = "alpha";
pub const DEFAULT_CANARY_SUFFIX: &str = "alpha";
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Raw `monopub publish` arguments, before they are merged with `monopub.json`.
#[derive(Debug, Clone, Default)]
pub struct PublishInput {
    /// Increment keyword, or an explicit version when it parses as semver.
    pub bump: Option<String>,
    pub repo_version: Option<String>,
    pub canary: bool,
    pub canary_suffix: Option<String>,
    pub independent: bool,
    pub conventional_commits: bool,
    pub changelog_preset: Option<String>,
    pub exact: bool,
    pub yes: bool,
    pub skip_git: bool,
    pub skip_npm: bool,
    pub temp_tag: bool,
    pub dry_run: bool,
    pub npm_tag: Option<String>,
    pub pre_dist_tag: Option<String>,
    pub registry: Option<String>,
    pub git_remote: Option<String>,
    pub message: Option<String>,
    pub preid: Option<String>,
    pub concurrency: Option<usize>,
    pub ignore: Vec<String>,
    pub allow_branch: Vec<String>,
}

/// Package-name globs excluded from release and publish.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    patterns: Vec<String>,
    set: GlobSet,
}

impl IgnoreMatcher {
    /// # Errors
    ///
    /// Returns `ValidationError::IgnorePattern` for a malformed glob.
    pub fn new(patterns: &[String]) -> Result<Self, ValidationError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|source| ValidationError::IgnorePattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .map_err(|source| ValidationError::IgnorePattern {
                pattern: patterns.join(", "),
                source,
            })?;

        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p == name) || self.set.is_match(name)
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for IgnoreMatcher {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        }
    }
}

/// Effective publish settings: command line first, then `monopub.json`, then defaults.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub mode: ReleaseMode,
    pub repo_version: Option<Version>,
    pub bump: Option<BumpKeyword>,
    /// Suffix of a canary release; `None` outside canary mode.
    pub canary: Option<String>,
    pub conventional_commits: bool,
    pub changelog_preset: ChangelogPreset,
    pub exact: bool,
    pub yes: bool,
    pub skip_git: bool,
    pub skip_npm: bool,
    pub temp_tag: bool,
    pub dry_run: bool,
    pub npm_tag: Option<String>,
    pub pre_dist_tag: Option<String>,
    pub registry: Option<String>,
    pub git_remote: String,
    pub message: Option<String>,
    pub preid: String,
    pub concurrency: usize,
    pub ignore: IgnoreMatcher,
    pub branch_gate: BranchGate,
}

impl PublishOptions {
    /// Merges `input` over the persisted configuration and validates every value.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` for any malformed or conflicting option.
    pub fn resolve(input: PublishInput, config: &RootConfig) -> Result<Self, ValidationError> {
        let persisted = config.publish();
        let mode = if input.independent {
            ReleaseMode::Independent
        } else {
            config.mode()
        };

        // `publish --canary beta`: a positional that is neither a version
        // nor a keyword names the canary suffix.
        let mut canary_suffix = input.canary_suffix;
        let (explicit_from_bump, bump) = match input.bump {
            None => (None, None),
            Some(raw) => match parse_version(&raw) {
                Ok(version) => (Some(version), None),
                Err(_) => match raw.parse::<BumpKeyword>() {
                    Ok(keyword) => (None, Some(keyword)),
                    Err(_) if input.canary && canary_suffix.is_none() => {
                        canary_suffix = Some(raw);
                        (None, None)
                    }
                    Err(err) => return Err(err.into()),
                },
            },
        };
        let repo_version = match input.repo_version.as_deref() {
            Some(raw) => Some(parse_version(raw)?),
            None => explicit_from_bump,
        };

        if repo_version.is_some() && mode.is_independent() {
            return Err(ValidationError::RepoVersionInIndependentMode);
        }
        if repo_version.is_some() && input.canary {
            return Err(ValidationError::RepoVersionWithCanary);
        }

        let canary = if input.canary {
            let suffix = canary_suffix.unwrap_or_else(|| DEFAULT_CANARY_SUFFIX.to_string());
            Some(validate_identifier(suffix)?)
        } else {
            None
        };

        let preid = validate_identifier(
            input
                .preid
                .or_else(|| persisted.preid.clone())
                .unwrap_or_else(|| DEFAULT_PREID.to_string()),
        )?;

        let changelog_preset = match input
            .changelog_preset
            .as_deref()
            .or(persisted.changelog_preset.as_deref())
        {
            Some(name) => name.parse::<ChangelogPreset>()?,
            None => ChangelogPreset::default(),
        };

        let concurrency = input
            .concurrency
            .or(persisted.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            return Err(ValidationError::ZeroConcurrency);
        }

        let mut ignore_patterns = persisted.ignore.clone();
        ignore_patterns.extend(input.ignore);
        let ignore = IgnoreMatcher::new(&ignore_patterns)?;

        let branch_gate = BranchGate::new(&input.allow_branch, persisted.allow_branch.as_ref())?;

        Ok(Self {
            mode,
            repo_version,
            bump,
            canary,
            conventional_commits: input.conventional_commits || persisted.conventional_commits,
            changelog_preset,
            exact: input.exact || persisted.exact,
            yes: input.yes,
            skip_git: input.skip_git,
            skip_npm: input.skip_npm,
            temp_tag: input.temp_tag || persisted.temp_tag,
            dry_run: input.dry_run,
            npm_tag: input.npm_tag.or_else(|| persisted.npm_tag.clone()),
            pre_dist_tag: input.pre_dist_tag.or_else(|| persisted.pre_dist_tag.clone()),
            registry: input.registry.or_else(|| persisted.registry.clone()),
            git_remote: input
                .git_remote
                .or_else(|| persisted.git_remote.clone())
                .unwrap_or_else(|| DEFAULT_GIT_REMOTE.to_string()),
            message: input.message.or_else(|| persisted.message.clone()),
            preid,
            concurrency,
            ignore,
            branch_gate,
        })
    }

    #[must_use]
    pub fn is_canary(&self) -> bool {
        self.canary.is_some()
    }

    /// Whether packages already on a prerelease are swept into this release.
    ///
    /// Only requests that are known up front to produce a final version qualify.
    #[must_use]
    pub fn sweeps_prereleases(&self) -> bool {
        if self.is_canary() {
            return false;
        }
        if let Some(version) = &self.repo_version {
            return version.pre.is_empty();
        }
        match self.bump {
            Some(keyword) => !keyword.is_prerelease(),
            None => self.conventional_commits,
        }
    }
}

/// Accepts an optional leading `v`, as in `v1.2.3`.
pub(crate) fn parse_version(raw: &str) -> Result<Version, ValidationError> {
    Version::parse(raw.strip_prefix('v').unwrap_or(raw)).map_err(|source| {
        ValidationError::InvalidVersion {
            value: raw.to_string(),
            source,
        }
    })
}

fn validate_identifier(value: String) -> Result<String, ValidationError> {
    if value.is_empty() || value.contains('.') || Prerelease::new(&value).is_err() {
        return Err(ValidationError::InvalidPreid { value });
    }
    Ok(value)
}
