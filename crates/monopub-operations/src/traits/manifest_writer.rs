use std::path::Path;

use monopub_manifest::PackageManifest;
use semver::Version;

use crate::Result;

pub trait ManifestWriter: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    fn load(&self, path: &Path) -> Result<PackageManifest>;

    /// # Errors
    ///
    /// Returns an error if the manifest cannot be written.
    fn write(&self, manifest: &mut PackageManifest) -> Result<()>;

    /// Records the shared fixed-mode version in the workspace-root record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be read or written.
    fn write_root_version(&self, path: &Path, version: &Version) -> Result<()>;
}
