use std::path::Path;

use monopub_operations::operations::{PublishInput, PublishOperation};
use monopub_operations::providers::{
    ConventionalChangelogProvider, FileSystemManifestWriter, FileSystemProjectProvider,
    Git2Provider, NpmRegistryClient,
};

use super::PublishArgs;
use crate::environment::npm_client;
use crate::error::Result;
use crate::interaction::TerminalInteractionProvider;
use crate::output::render_outcome;

pub(crate) fn run(args: PublishArgs, start_path: &Path) -> Result<()> {
    let registry = match npm_client() {
        Some(program) => NpmRegistryClient::new().with_program(program),
        None => NpmRegistryClient::new(),
    };

    let operation = PublishOperation::new(
        FileSystemProjectProvider::new(),
        Git2Provider::new(),
        registry,
        TerminalInteractionProvider::new(),
        ConventionalChangelogProvider::new(),
        FileSystemManifestWriter::new(),
    );

    let outcome = operation.execute(start_path, build_input(args))?;
    print!("{}", render_outcome(&outcome));
    Ok(())
}

fn build_input(args: PublishArgs) -> PublishInput {
    PublishInput {
        bump: args.bump,
        repo_version: args.repo_version,
        canary: args.canary.is_some(),
        canary_suffix: args.canary.flatten(),
        independent: args.independent,
        conventional_commits: args.conventional_commits,
        changelog_preset: args.changelog_preset,
        exact: args.exact,
        yes: args.yes,
        skip_git: args.skip_git,
        skip_npm: args.skip_npm,
        temp_tag: args.temp_tag,
        dry_run: args.dry_run,
        npm_tag: args.npm_tag,
        pre_dist_tag: args.pre_dist_tag,
        registry: args.registry,
        git_remote: args.git_remote,
        message: args.message,
        preid: args.preid,
        concurrency: args.concurrency,
        ignore: args.ignore,
        allow_branch: args.allow_branch,
    }
}
