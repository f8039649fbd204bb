use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use monopub_core::{BumpKeyword, PackageInfo};
use monopub_git::{CommitInfo, FileChange, GitError, TagInfo};
use monopub_manifest::PackageManifest;
use monopub_project::{ROOT_CONFIG_FILE, RootConfig, Workspace};
use semver::Version;

use crate::Result;
use crate::error::{OperationError, RegistryAction};
use crate::traits::{
    ConventionalCommits, ConventionalContext, GitProvider, InteractionProvider, ManifestWriter,
    ProjectProvider, RegistryClient,
};
use crate::types::PublishTarget;

const MOCK_ROOT: &str = "/ws";

pub struct MockProjectProvider {
    workspace: Workspace,
}

impl MockProjectProvider {
    #[must_use]
    pub fn new(workspace: Workspace) -> Self {
        Self { workspace }
    }

    /// A workspace at `/ws` whose packages are the manifests seeded into `writer`.
    ///
    /// # Panics
    ///
    /// Panics if a seeded manifest lacks a valid name or version.
    #[must_use]
    pub fn from_writer(writer: &MockManifestWriter, config: RootConfig) -> Self {
        let root = PathBuf::from(MOCK_ROOT);
        let packages = writer
            .seeded()
            .iter()
            .map(|manifest| manifest.to_package_info().expect("valid seeded manifest"))
            .collect();

        Self::new(Workspace {
            config_path: root.join(ROOT_CONFIG_FILE),
            root,
            config,
            packages,
        })
    }
}

impl ProjectProvider for MockProjectProvider {
    fn discover_workspace(&self, _start_path: &Path) -> Result<Workspace> {
        Ok(self.workspace.clone())
    }
}

impl ProjectProvider for Arc<MockProjectProvider> {
    fn discover_workspace(&self, start_path: &Path) -> Result<Workspace> {
        (**self).discover_workspace(start_path)
    }
}

pub struct MockGitProvider {
    initialized: bool,
    clean: bool,
    branch: Option<String>,
    head_sha: String,
    last_tag: Option<String>,
    changes: HashMap<PathBuf, Vec<FileChange>>,
    fail_commit: bool,
    staged_files: Mutex<Vec<PathBuf>>,
    commits: Mutex<Vec<String>>,
    tags_created: Mutex<Vec<(String, String)>>,
    reverted: Mutex<Vec<String>>,
    pushes: Mutex<Vec<(String, String, Vec<String>)>>,
}

impl MockGitProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            initialized: true,
            clean: true,
            branch: Some("main".to_string()),
            head_sha: "abc1234".to_string(),
            last_tag: None,
            changes: HashMap::new(),
            fail_commit: false,
            staged_files: Mutex::new(Vec::new()),
            commits: Mutex::new(Vec::new()),
            tags_created: Mutex::new(Vec::new()),
            reverted: Mutex::new(Vec::new()),
            pushes: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_branch(mut self, branch: &str) -> Self {
        self.branch = Some(branch.to_string());
        self
    }

    #[must_use]
    pub fn with_detached_head(mut self) -> Self {
        self.branch = None;
        self
    }

    #[must_use]
    pub fn is_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    #[must_use]
    pub fn uninitialized(mut self) -> Self {
        self.initialized = false;
        self
    }

    #[must_use]
    pub fn with_head_sha(mut self, sha: &str) -> Self {
        self.head_sha = sha.to_string();
        self
    }

    #[must_use]
    pub fn with_last_tag(mut self, tag: &str) -> Self {
        self.last_tag = Some(tag.to_string());
        self
    }

    /// Changes reported for the package directory `dir` since the last tag.
    #[must_use]
    pub fn with_changes_in(mut self, dir: &str, changes: Vec<FileChange>) -> Self {
        self.changes.insert(PathBuf::from(dir), changes);
        self
    }

    #[must_use]
    pub fn with_failing_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn staged_files(&self) -> Vec<PathBuf> {
        self.staged_files.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn commits(&self) -> Vec<String> {
        self.commits.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn created_tags(&self) -> Vec<(String, String)> {
        self.tags_created.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn reverted(&self) -> Vec<String> {
        self.reverted.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn pushes(&self) -> Vec<(String, String, Vec<String>)> {
        self.pushes.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockGitProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GitProvider for MockGitProvider {
    fn is_initialized(&self, _project_root: &Path) -> bool {
        self.initialized
    }

    fn current_branch(&self, _project_root: &Path) -> Result<String> {
        self.branch
            .clone()
            .ok_or(OperationError::VersionControl(GitError::DetachedHead))
    }

    fn head_sha(&self, _project_root: &Path) -> Result<String> {
        Ok(self.head_sha.clone())
    }

    fn has_tags(&self, _project_root: &Path) -> Result<bool> {
        Ok(self.last_tag.is_some())
    }

    fn last_tag(&self, _project_root: &Path, _pattern: &str) -> Result<Option<String>> {
        Ok(self.last_tag.clone())
    }

    fn changed_files_since(
        &self,
        _project_root: &Path,
        _tag: &str,
        dir: &Path,
    ) -> Result<Vec<FileChange>> {
        Ok(self.changes.get(dir).cloned().unwrap_or_default())
    }

    fn is_working_tree_clean(&self, _project_root: &Path) -> Result<bool> {
        Ok(self.clean)
    }

    fn stage_files(&self, _project_root: &Path, paths: &[&Path]) -> Result<()> {
        self.staged_files
            .lock()
            .expect("lock poisoned")
            .extend(paths.iter().map(|p| p.to_path_buf()));
        Ok(())
    }

    fn commit(&self, _project_root: &Path, message: &str) -> Result<CommitInfo> {
        if self.fail_commit {
            return Err(GitError::NoCommits.into());
        }
        self.commits
            .lock()
            .expect("lock poisoned")
            .push(message.to_string());
        Ok(CommitInfo {
            sha: "abc123def456".to_string(),
            message: message.to_string(),
        })
    }

    fn create_tag(&self, _project_root: &Path, tag_name: &str, message: &str) -> Result<TagInfo> {
        self.tags_created
            .lock()
            .expect("lock poisoned")
            .push((tag_name.to_string(), message.to_string()));
        Ok(TagInfo {
            name: tag_name.to_string(),
            target_sha: "abc123def456".to_string(),
        })
    }

    fn revert_paths(&self, _project_root: &Path, pattern: &str) -> Result<()> {
        self.reverted
            .lock()
            .expect("lock poisoned")
            .push(pattern.to_string());
        Ok(())
    }

    fn push_with_tags(
        &self,
        _project_root: &Path,
        remote: &str,
        branch: &str,
        tags: &[String],
    ) -> Result<()> {
        self.pushes.lock().expect("lock poisoned").push((
            remote.to_string(),
            branch.to_string(),
            tags.to_vec(),
        ));
        Ok(())
    }
}

impl GitProvider for Arc<MockGitProvider> {
    fn is_initialized(&self, project_root: &Path) -> bool {
        (**self).is_initialized(project_root)
    }

    fn current_branch(&self, project_root: &Path) -> Result<String> {
        (**self).current_branch(project_root)
    }

    fn head_sha(&self, project_root: &Path) -> Result<String> {
        (**self).head_sha(project_root)
    }

    fn has_tags(&self, project_root: &Path) -> Result<bool> {
        (**self).has_tags(project_root)
    }

    fn last_tag(&self, project_root: &Path, pattern: &str) -> Result<Option<String>> {
        (**self).last_tag(project_root, pattern)
    }

    fn changed_files_since(
        &self,
        project_root: &Path,
        tag: &str,
        dir: &Path,
    ) -> Result<Vec<FileChange>> {
        (**self).changed_files_since(project_root, tag, dir)
    }

    fn is_working_tree_clean(&self, project_root: &Path) -> Result<bool> {
        (**self).is_working_tree_clean(project_root)
    }

    fn stage_files(&self, project_root: &Path, paths: &[&Path]) -> Result<()> {
        (**self).stage_files(project_root, paths)
    }

    fn commit(&self, project_root: &Path, message: &str) -> Result<CommitInfo> {
        (**self).commit(project_root, message)
    }

    fn create_tag(&self, project_root: &Path, tag_name: &str, message: &str) -> Result<TagInfo> {
        (**self).create_tag(project_root, tag_name, message)
    }

    fn revert_paths(&self, project_root: &Path, pattern: &str) -> Result<()> {
        (**self).revert_paths(project_root, pattern)
    }

    fn push_with_tags(
        &self,
        project_root: &Path,
        remote: &str,
        branch: &str,
        tags: &[String],
    ) -> Result<()> {
        (**self).push_with_tags(project_root, remote, branch, tags)
    }
}

/// A registry call, identified by the `name@version` spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    Publish(String, String),
    AddDistTag(String, String),
    RemoveDistTag(String, String),
    Script(String, String),
}

pub struct MockRegistryClient {
    failing_publish: HashSet<String>,
    failing_scripts: HashSet<(String, String)>,
    dist_tags: Mutex<HashSet<(String, String)>>,
    calls: Mutex<Vec<RegistryCall>>,
}

impl MockRegistryClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            failing_publish: HashSet::new(),
            failing_scripts: HashSet::new(),
            dist_tags: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_failing_publish(mut self, package: &str) -> Self {
        self.failing_publish.insert(package.to_string());
        self
    }

    #[must_use]
    pub fn with_failing_script(mut self, package: &str, script: &str) -> Self {
        self.failing_scripts
            .insert((package.to_string(), script.to_string()));
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    /// Successful publishes as `(spec, dist_tag)`, in completion order.
    #[must_use]
    pub fn published(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RegistryCall::Publish(spec, tag) => Some((spec, tag)),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn dist_tag_changes(&self) -> Vec<RegistryCall> {
        self.calls()
            .into_iter()
            .filter(|call| {
                matches!(
                    call,
                    RegistryCall::AddDistTag(..) | RegistryCall::RemoveDistTag(..)
                )
            })
            .collect()
    }

    fn record(&self, call: RegistryCall) {
        self.calls.lock().expect("lock poisoned").push(call);
    }
}

impl Default for MockRegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryClient for MockRegistryClient {
    fn publish(&self, target: &PublishTarget, dist_tag: &str) -> Result<()> {
        if self.failing_publish.contains(&target.package) {
            return Err(OperationError::Registry {
                package: target.package.clone(),
                action: RegistryAction::Publish,
                message: "E403 forbidden".to_string(),
            });
        }
        self.dist_tags
            .lock()
            .expect("lock poisoned")
            .insert((target.spec(), dist_tag.to_string()));
        self.record(RegistryCall::Publish(target.spec(), dist_tag.to_string()));
        Ok(())
    }

    fn dist_tag_exists(&self, target: &PublishTarget, dist_tag: &str) -> Result<bool> {
        Ok(self
            .dist_tags
            .lock()
            .expect("lock poisoned")
            .contains(&(target.spec(), dist_tag.to_string())))
    }

    fn remove_dist_tag(&self, target: &PublishTarget, dist_tag: &str) -> Result<()> {
        self.dist_tags
            .lock()
            .expect("lock poisoned")
            .remove(&(target.spec(), dist_tag.to_string()));
        self.record(RegistryCall::RemoveDistTag(target.spec(), dist_tag.to_string()));
        Ok(())
    }

    fn add_dist_tag(&self, target: &PublishTarget, dist_tag: &str) -> Result<()> {
        self.dist_tags
            .lock()
            .expect("lock poisoned")
            .insert((target.spec(), dist_tag.to_string()));
        self.record(RegistryCall::AddDistTag(target.spec(), dist_tag.to_string()));
        Ok(())
    }

    fn run_lifecycle_script(&self, package: &PackageInfo, script: &str) -> Result<()> {
        self.record(RegistryCall::Script(package.name.clone(), script.to_string()));
        if self
            .failing_scripts
            .contains(&(package.name.clone(), script.to_string()))
        {
            return Err(OperationError::LifecycleScript {
                package: package.name.clone(),
                script: script.to_string(),
                code: Some(1),
            });
        }
        Ok(())
    }
}

impl RegistryClient for Arc<MockRegistryClient> {
    fn publish(&self, target: &PublishTarget, dist_tag: &str) -> Result<()> {
        (**self).publish(target, dist_tag)
    }

    fn dist_tag_exists(&self, target: &PublishTarget, dist_tag: &str) -> Result<bool> {
        (**self).dist_tag_exists(target, dist_tag)
    }

    fn remove_dist_tag(&self, target: &PublishTarget, dist_tag: &str) -> Result<()> {
        (**self).remove_dist_tag(target, dist_tag)
    }

    fn add_dist_tag(&self, target: &PublishTarget, dist_tag: &str) -> Result<()> {
        (**self).add_dist_tag(target, dist_tag)
    }

    fn run_lifecycle_script(&self, package: &PackageInfo, script: &str) -> Result<()> {
        (**self).run_lifecycle_script(package, script)
    }
}

/// Scripted answers. An unscripted prompt fails with `InteractionRequired`.
pub struct MockInteractionProvider {
    selections: Mutex<VecDeque<Option<usize>>>,
    inputs: Mutex<VecDeque<Option<String>>>,
    confirmation: bool,
    select_prompts: Mutex<Vec<(String, Vec<String>)>>,
    confirmations: Mutex<Vec<String>>,
}

impl MockInteractionProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            selections: Mutex::new(VecDeque::new()),
            inputs: Mutex::new(VecDeque::new()),
            confirmation: true,
            select_prompts: Mutex::new(Vec::new()),
            confirmations: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_selections(self, selections: Vec<Option<usize>>) -> Self {
        *self.selections.lock().expect("lock poisoned") = selections.into();
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_inputs(self, inputs: Vec<Option<String>>) -> Self {
        *self.inputs.lock().expect("lock poisoned") = inputs.into();
        self
    }

    #[must_use]
    pub fn with_confirmation(mut self, confirmation: bool) -> Self {
        self.confirmation = confirmation;
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn select_prompts(&self) -> Vec<(String, Vec<String>)> {
        self.select_prompts.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockInteractionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionProvider for MockInteractionProvider {
    fn select_one(&self, message: &str, choices: &[String]) -> Result<Option<usize>> {
        self.select_prompts
            .lock()
            .expect("lock poisoned")
            .push((message.to_string(), choices.to_vec()));
        self.selections
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .ok_or(OperationError::InteractionRequired)
    }

    fn confirm(&self, message: &str) -> Result<bool> {
        self.confirmations
            .lock()
            .expect("lock poisoned")
            .push(message.to_string());
        Ok(self.confirmation)
    }

    fn input(&self, _message: &str) -> Result<Option<String>> {
        self.inputs
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .ok_or(OperationError::InteractionRequired)
    }
}

impl InteractionProvider for Arc<MockInteractionProvider> {
    fn select_one(&self, message: &str, choices: &[String]) -> Result<Option<usize>> {
        (**self).select_one(message, choices)
    }

    fn confirm(&self, message: &str) -> Result<bool> {
        (**self).confirm(message)
    }

    fn input(&self, message: &str) -> Result<Option<String>> {
        (**self).input(message)
    }
}

/// Recommends `patch` unless told otherwise.
pub struct MockConventionalCommits {
    recommendations: HashMap<String, BumpKeyword>,
    changelog_updates: Mutex<Vec<String>>,
}

impl MockConventionalCommits {
    #[must_use]
    pub fn new() -> Self {
        Self {
            recommendations: HashMap::new(),
            changelog_updates: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_recommendation(mut self, package: &str, bump: BumpKeyword) -> Self {
        self.recommendations.insert(package.to_string(), bump);
        self
    }

    /// Updated changelogs as `name@version`, with `<root>` for the workspace root.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn changelog_updates(&self) -> Vec<String> {
        self.changelog_updates.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockConventionalCommits {
    fn default() -> Self {
        Self::new()
    }
}

impl ConventionalCommits for MockConventionalCommits {
    fn recommend_bump(
        &self,
        _context: &ConventionalContext<'_>,
        package: &PackageInfo,
    ) -> Result<BumpKeyword> {
        Ok(self
            .recommendations
            .get(&package.name)
            .copied()
            .unwrap_or(BumpKeyword::Patch))
    }

    fn update_changelog(
        &self,
        _context: &ConventionalContext<'_>,
        package: &PackageInfo,
        version: &Version,
    ) -> Result<PathBuf> {
        self.changelog_updates
            .lock()
            .expect("lock poisoned")
            .push(format!("{}@{version}", package.name));
        Ok(package.directory.join("CHANGELOG.md"))
    }

    fn update_root_changelog(
        &self,
        context: &ConventionalContext<'_>,
        version: &Version,
    ) -> Result<PathBuf> {
        self.changelog_updates
            .lock()
            .expect("lock poisoned")
            .push(format!("<root>@{version}"));
        Ok(context.project_root.join("CHANGELOG.md"))
    }
}

impl ConventionalCommits for Arc<MockConventionalCommits> {
    fn recommend_bump(
        &self,
        context: &ConventionalContext<'_>,
        package: &PackageInfo,
    ) -> Result<BumpKeyword> {
        (**self).recommend_bump(context, package)
    }

    fn update_changelog(
        &self,
        context: &ConventionalContext<'_>,
        package: &PackageInfo,
        version: &Version,
    ) -> Result<PathBuf> {
        (**self).update_changelog(context, package, version)
    }

    fn update_root_changelog(
        &self,
        context: &ConventionalContext<'_>,
        version: &Version,
    ) -> Result<PathBuf> {
        (**self).update_root_changelog(context, version)
    }
}

/// Manifests kept in memory. Writes replace the stored content.
pub struct MockManifestWriter {
    contents: Mutex<BTreeMap<PathBuf, String>>,
    written: Mutex<Vec<PathBuf>>,
    root_versions: Mutex<Vec<(PathBuf, Version)>>,
}

impl MockManifestWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            contents: Mutex::new(BTreeMap::new()),
            written: Mutex::new(Vec::new()),
            root_versions: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_manifest(self, path: &str, content: &str) -> Self {
        self.contents
            .lock()
            .expect("lock poisoned")
            .insert(PathBuf::from(path), content.to_string());
        self
    }

    /// Seeds `<dir>/package.json` with just a name and version.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_package(self, dir: &str, name: &str, version: &str) -> Self {
        let path = Path::new(dir).join("package.json");
        let content = format!("{{\n  \"name\": \"{name}\",\n  \"version\": \"{version}\"\n}}\n");
        self.contents
            .lock()
            .expect("lock poisoned")
            .insert(path, content);
        self
    }

    /// Every stored manifest, parsed, in path order.
    ///
    /// # Panics
    ///
    /// Panics if a stored manifest is not valid JSON.
    #[must_use]
    pub fn seeded(&self) -> Vec<PackageManifest> {
        self.contents
            .lock()
            .expect("lock poisoned")
            .iter()
            .map(|(path, content)| {
                PackageManifest::parse(path, content).expect("valid seeded manifest")
            })
            .collect()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn written_manifests(&self) -> Vec<PathBuf> {
        self.written.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn root_versions(&self) -> Vec<(PathBuf, Version)> {
        self.root_versions.lock().expect("lock poisoned").clone()
    }

    /// The current content of `path`, parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is stored at `path`.
    pub fn written(&self, path: &str) -> Result<PackageManifest> {
        self.load(Path::new(path))
    }
}

impl Default for MockManifestWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestWriter for MockManifestWriter {
    fn load(&self, path: &Path) -> Result<PackageManifest> {
        let contents = self.contents.lock().expect("lock poisoned");
        let content = contents.get(path).ok_or_else(|| {
            OperationError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("mock manifest not found: {}", path.display()),
            ))
        })?;
        Ok(PackageManifest::parse(path, content)?)
    }

    fn write(&self, manifest: &mut PackageManifest) -> Result<()> {
        let rendered = manifest.render()?;
        self.contents
            .lock()
            .expect("lock poisoned")
            .insert(manifest.path().to_path_buf(), rendered);
        self.written
            .lock()
            .expect("lock poisoned")
            .push(manifest.path().to_path_buf());
        Ok(())
    }

    fn write_root_version(&self, path: &Path, version: &Version) -> Result<()> {
        self.root_versions
            .lock()
            .expect("lock poisoned")
            .push((path.to_path_buf(), version.clone()));
        Ok(())
    }
}

impl ManifestWriter for Arc<MockManifestWriter> {
    fn load(&self, path: &Path) -> Result<PackageManifest> {
        (**self).load(path)
    }

    fn write(&self, manifest: &mut PackageManifest) -> Result<()> {
        (**self).write(manifest)
    }

    fn write_root_version(&self, path: &Path, version: &Version) -> Result<()> {
        (**self).write_root_version(path, version)
    }
}
