mod branch_gate;
mod change_detector;
mod dependency_updater;
mod git_orchestrator;
mod operation;
mod options;
mod publish_orchestrator;
mod release_recorder;
mod version_resolver;

pub use branch_gate::BranchGate;
pub use change_detector::{ChangeSetDetector, DetectOptions, release_tag_pattern};
pub use dependency_updater::DependencyGraphUpdater;
pub use git_orchestrator::{GitReleaseOrchestrator, format_commit_message};
pub use operation::PublishOperation;
pub use options::{
    DEFAULT_CANARY_SUFFIX, DEFAULT_CONCURRENCY, DEFAULT_GIT_REMOTE, DEFAULT_PREID, IgnoreMatcher,
    PublishInput, PublishOptions,
};
pub use publish_orchestrator::{
    DistTagOptions, PublishOrchestrator, TEMP_DIST_TAG, publish_targets, resolve_dist_tag,
};
pub use release_recorder::ReleaseRecorder;
pub use version_resolver::{Resolution, VersionResolver, VersionStrategy};
