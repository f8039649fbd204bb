use monopub_core::PackageInfo;

use crate::Result;
use crate::types::PublishTarget;

/// The package registry and the package manager that runs scripts.
///
/// Implementations are shared across the publish worker pool.
pub trait RegistryClient: Send + Sync {
    /// # Errors
    ///
    /// Returns `OperationError::Registry` if the registry rejects the package.
    fn publish(&self, target: &PublishTarget, dist_tag: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns `OperationError::Registry` if the dist-tags cannot be listed.
    fn dist_tag_exists(&self, target: &PublishTarget, dist_tag: &str) -> Result<bool>;

    /// # Errors
    ///
    /// Returns `OperationError::Registry` if the dist-tag cannot be removed.
    fn remove_dist_tag(&self, target: &PublishTarget, dist_tag: &str) -> Result<()>;

    /// Points `dist_tag` at `target`'s version.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::Registry` if the dist-tag cannot be set.
    fn add_dist_tag(&self, target: &PublishTarget, dist_tag: &str) -> Result<()>;

    /// Runs a script declared in the package's manifest, blocking until it exits.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::LifecycleScript` if the script exits unsuccessfully.
    fn run_lifecycle_script(&self, package: &PackageInfo, script: &str) -> Result<()>;
}
