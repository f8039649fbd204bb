use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use monopub_core::{PackageInfo, ReleaseMode};
use monopub_git::GitError;
use monopub_manifest::PackageManifest;
use monopub_project::{PackageGraph, Workspace};
use semver::Version;
use tracing::{info, warn};

use super::change_detector::{ChangeSetDetector, DetectOptions, release_tag_pattern};
use super::dependency_updater::DependencyGraphUpdater;
use super::git_orchestrator::{GitReleaseOrchestrator, format_commit_message};
use super::options::{PublishInput, PublishOptions};
use super::publish_orchestrator::{DistTagOptions, PublishOrchestrator, publish_targets};
use super::release_recorder::ReleaseRecorder;
use super::version_resolver::{Resolution, VersionResolver, VersionStrategy};
use crate::Result;
use crate::error::OperationError;
use crate::traits::{
    ConventionalCommits, ConventionalContext, GitProvider, InteractionProvider, ManifestWriter,
    ProjectProvider, RegistryClient,
};
use crate::types::{PublishOutcome, PublishReport, PublishTarget, ReleasePlan};

pub struct PublishOperation<P, G, R, I, C, M> {
    project_provider: P,
    git_provider: G,
    registry: R,
    interaction: I,
    conventional: C,
    manifest_writer: M,
}

impl<P, G, R, I, C, M> PublishOperation<P, G, R, I, C, M>
where
    P: ProjectProvider,
    G: GitProvider,
    R: RegistryClient,
    I: InteractionProvider,
    C: ConventionalCommits,
    M: ManifestWriter,
{
    pub fn new(
        project_provider: P,
        git_provider: G,
        registry: R,
        interaction: I,
        conventional: C,
        manifest_writer: M,
    ) -> Self {
        Self {
            project_provider,
            git_provider,
            registry,
            interaction,
            conventional,
            manifest_writer,
        }
    }

    /// Runs the whole release: gate, detection, versioning, manifest updates,
    /// git commit/tag/push (or canary revert) and registry publish.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error before any side effect for malformed
    /// options, and the first failure of any later stage otherwise. Nothing
    /// written before a failure is rolled back.
    pub fn execute(&self, start_path: &Path, input: PublishInput) -> Result<PublishOutcome> {
        let workspace = self.project_provider.discover_workspace(start_path)?;
        if workspace.packages.is_empty() {
            return Err(OperationError::EmptyWorkspace(workspace.root));
        }

        let options = PublishOptions::resolve(input, &workspace.config)?;
        let root = workspace.root.as_path();
        let branch = self.preflight(root, &options)?;

        let graph = workspace.graph();
        let last_tag = self.last_release_tag(root, options.mode)?;
        let candidates = ChangeSetDetector::new(&self.git_provider, root).detect(
            &graph,
            &DetectOptions {
                last_tag: last_tag.as_deref(),
                ignore: &options.ignore,
                sweep_prereleases: options.sweeps_prereleases(),
            },
        )?;

        if candidates.is_empty() {
            info!(last_tag = ?last_tag, "no changed packages since the last release");
            return Ok(PublishOutcome::NoChanges);
        }

        let context = ConventionalContext {
            project_root: root,
            preset: options.changelog_preset,
            mode: options.mode,
        };
        let resolver = VersionResolver::new(
            &self.git_provider,
            &self.interaction,
            &self.conventional,
            context,
            &options.preid,
            options.yes,
        );
        let strategy = VersionStrategy::select(&options);
        let current = current_repo_version(&workspace, &graph);
        let plan = match resolver.resolve(&strategy, &candidates, &current)? {
            Resolution::Planned(plan) => plan,
            Resolution::Declined => return Ok(PublishOutcome::Declined),
        };

        if options.dry_run {
            info!("dry run, stopping before any write");
            return Ok(PublishOutcome::DryRun(plan));
        }

        let mut manifests = self.load_manifests(&graph)?;
        let range_updates =
            DependencyGraphUpdater::new(options.exact).apply(&plan, &graph, &mut manifests);
        let written_files = ReleaseRecorder::new(&self.manifest_writer).record(
            &plan,
            &mut manifests,
            &workspace.config_path,
        )?;

        let changelogs = if options.conventional_commits && !plan.is_canary() {
            self.update_changelogs(&context, &plan, &graph)?
        } else {
            Vec::new()
        };

        let mut git = GitReleaseOrchestrator::new(&self.git_provider, root);
        if options.skip_git {
            if plan.is_canary() {
                warn!("canary release with --skip-git leaves manifest edits in the working tree");
            }
        } else if !plan.is_canary() {
            let mut staged = written_files.clone();
            staged.extend(changelogs.iter().cloned());
            git.stage(&staged)?;
            git.commit(&format_commit_message(options.message.as_deref(), &plan))?;
            git.tag(&plan.tags())?;
            let branch = branch.ok_or(GitError::DetachedHead)?;
            git.push(&options.git_remote, &branch)?;
        }

        let published = if options.skip_npm {
            info!("skipping registry publish");
            Ok(Vec::new())
        } else {
            self.publish(&plan, &graph, &options)
        };

        if plan.is_canary() && !options.skip_git {
            if let Err(err) = git.revert(&workspace.manifest_pathspecs()) {
                if published.is_ok() {
                    return Err(err);
                }
                warn!(error = %err, "failed to revert canary manifest edits");
            }
        }
        let published = published?;

        Ok(PublishOutcome::Completed(PublishReport {
            commit_sha: git.commit_sha().map(String::from),
            tags: git.tags().to_vec(),
            git_state: git.state(),
            plan,
            range_updates,
            written_files,
            changelogs,
            published,
        }))
    }

    /// Returns the current branch, or `None` for a canary run on a detached HEAD.
    fn preflight(&self, root: &Path, options: &PublishOptions) -> Result<Option<String>> {
        if !self.git_provider.is_initialized(root) {
            return Err(OperationError::NotInitialized(root.to_path_buf()));
        }

        if !options.skip_git
            && !options.dry_run
            && !self.git_provider.is_working_tree_clean(root)?
        {
            return Err(OperationError::DirtyWorkingTree);
        }

        let branch = match self.git_provider.current_branch(root) {
            Ok(branch) => branch,
            Err(OperationError::VersionControl(GitError::DetachedHead)) if options.is_canary() => {
                info!("detached HEAD, publishing canary without a branch");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        options.branch_gate.check(&branch, options.is_canary())?;
        Ok(Some(branch))
    }

    fn last_release_tag(&self, root: &Path, mode: ReleaseMode) -> Result<Option<String>> {
        if !self.git_provider.has_tags(root)? {
            return Ok(None);
        }
        let tag = self.git_provider.last_tag(root, release_tag_pattern(mode))?;
        info!(tag = ?tag, "found previous release tag");
        Ok(tag)
    }

    fn load_manifests(&self, graph: &PackageGraph) -> Result<IndexMap<String, PackageManifest>> {
        graph
            .topological_order()
            .into_iter()
            .map(|package| {
                let manifest = self.manifest_writer.load(&package.manifest_path)?;
                Ok((package.name.clone(), manifest))
            })
            .collect()
    }

    fn update_changelogs(
        &self,
        context: &ConventionalContext<'_>,
        plan: &ReleasePlan,
        graph: &PackageGraph,
    ) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(plan.versions.len() + 1);
        for (name, version) in &plan.versions {
            if let Some(package) = graph.get(name) {
                paths.push(self.conventional.update_changelog(context, package, version)?);
            }
        }
        if plan.mode == ReleaseMode::Fixed {
            if let Some(version) = &plan.repo_version {
                paths.push(self.conventional.update_root_changelog(context, version)?);
            }
        }
        info!(count = paths.len(), "updated changelogs");
        Ok(paths)
    }

    fn publish(
        &self,
        plan: &ReleasePlan,
        graph: &PackageGraph,
        options: &PublishOptions,
    ) -> Result<Vec<PublishTarget>> {
        let dist_tags = DistTagOptions {
            npm_tag: options.npm_tag.as_deref(),
            pre_dist_tag: options.pre_dist_tag.as_deref(),
            canary: plan.is_canary(),
        };
        let targets = publish_targets(
            plan,
            graph,
            &options.ignore,
            &dist_tags,
            options.registry.as_deref(),
        );
        let packages: Vec<&PackageInfo> = targets
            .iter()
            .filter_map(|target| graph.get(&target.package))
            .collect();

        let orchestrator =
            PublishOrchestrator::new(&self.registry, options.concurrency, options.temp_tag);
        orchestrator.run_lifecycle(&packages)?;
        orchestrator.publish(&targets)?;
        Ok(targets)
    }
}

/// The shared version fixed mode increments from: the root record's version,
/// else the highest package version.
fn current_repo_version(workspace: &Workspace, graph: &PackageGraph) -> Version {
    workspace
        .config
        .version()
        .cloned()
        .or_else(|| graph.packages().map(|p| p.version.clone()).max())
        .unwrap_or_else(|| Version::new(0, 0, 0))
}
