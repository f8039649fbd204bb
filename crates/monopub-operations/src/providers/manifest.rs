use std::path::Path;

use monopub_manifest::{PackageManifest, RootRecord};
use semver::Version;
use tracing::debug;

use crate::Result;
use crate::traits::ManifestWriter;

pub struct FileSystemManifestWriter;

impl FileSystemManifestWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemManifestWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestWriter for FileSystemManifestWriter {
    fn load(&self, path: &Path) -> Result<PackageManifest> {
        Ok(PackageManifest::load(path)?)
    }

    fn write(&self, manifest: &mut PackageManifest) -> Result<()> {
        debug!(path = %manifest.path().display(), "writing manifest");
        Ok(manifest.save()?)
    }

    fn write_root_version(&self, path: &Path, version: &Version) -> Result<()> {
        debug!(path = %path.display(), %version, "writing root version");
        let mut record = RootRecord::load(path)?;
        record.set_version(version);
        Ok(record.save()?)
    }
}
