mod changed;
mod publish;

use std::path::Path;

use clap::{Args, Subcommand};

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Version, tag and publish the packages changed since the last release
    Publish(PublishArgs),
    /// List the packages the next release would include
    Changed(ChangedArgs),
}

#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Increment keyword (major, minor, patch, premajor, preminor, prepatch,
    /// prerelease) or an explicit version
    #[arg(value_name = "BUMP")]
    pub bump: Option<String>,

    /// Release every package at this exact version (fixed mode only)
    #[arg(long, value_name = "VERSION")]
    pub repo_version: Option<String>,

    /// Publish transient prerelease versions without committing or tagging
    #[arg(long, value_name = "SUFFIX", num_args = 0..=1, require_equals = true)]
    pub canary: Option<Option<String>>,

    /// Version packages independently instead of sharing one version
    #[arg(long)]
    pub independent: bool,

    /// Derive increments from conventional commits and write changelogs
    #[arg(long)]
    pub conventional_commits: bool,

    /// Changelog preset used with --conventional-commits
    #[arg(long, value_name = "NAME")]
    pub changelog_preset: Option<String>,

    /// Pin workspace dependencies to exact versions
    #[arg(long)]
    pub exact: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Do not commit, tag or push
    #[arg(long)]
    pub skip_git: bool,

    /// Do not publish to the registry
    #[arg(long)]
    pub skip_npm: bool,

    /// Publish under a temporary dist-tag, then move every package at once
    #[arg(long)]
    pub temp_tag: bool,

    /// Show the release plan without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Dist-tag to publish under
    #[arg(long, value_name = "TAG")]
    pub npm_tag: Option<String>,

    /// Dist-tag for prerelease versions
    #[arg(long, value_name = "TAG")]
    pub pre_dist_tag: Option<String>,

    /// Registry URL passed to the npm client
    #[arg(long, value_name = "URL")]
    pub registry: Option<String>,

    /// Remote to push the release commit and tags to
    #[arg(long, value_name = "NAME")]
    pub git_remote: Option<String>,

    /// Commit message template; %s expands to v<version>, %v to <version>
    #[arg(long, short = 'm', value_name = "TEMPLATE")]
    pub message: Option<String>,

    /// Prerelease identifier for pre* increments
    #[arg(long, value_name = "ID")]
    pub preid: Option<String>,

    /// Number of packages published in parallel
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Exclude packages whose name matches this glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Only publish from branches matching this glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub allow_branch: Vec<String>,
}

#[derive(Args)]
pub(crate) struct ChangedArgs {
    /// Exclude packages whose name matches this glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Compare against the last per-package tag
    #[arg(long)]
    pub independent: bool,
}

impl Commands {
    pub(crate) fn execute(self, start_path: &Path) -> Result<()> {
        match self {
            Self::Publish(args) => publish::run(args, start_path),
            Self::Changed(args) => changed::run(args, start_path),
        }
    }
}
