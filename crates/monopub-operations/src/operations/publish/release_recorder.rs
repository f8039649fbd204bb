use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use monopub_core::ReleaseMode;
use monopub_manifest::PackageManifest;
use tracing::{debug, info};

use crate::Result;
use crate::traits::ManifestWriter;
use crate::types::ReleasePlan;

/// Persists edited manifests and, in fixed mode, the shared version.
pub struct ReleaseRecorder<'a, M> {
    writer: &'a M,
}

impl<'a, M> ReleaseRecorder<'a, M>
where
    M: ManifestWriter,
{
    pub fn new(writer: &'a M) -> Self {
        Self { writer }
    }

    /// Returns every path written, root record last.
    ///
    /// # Errors
    ///
    /// Returns an error if any manifest or the root record cannot be written.
    /// Files written before the failure stay on disk.
    pub fn record(
        &self,
        plan: &ReleasePlan,
        manifests: &mut IndexMap<String, PackageManifest>,
        root_record: &Path,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        for (name, manifest) in manifests.iter_mut() {
            if !manifest.is_dirty() {
                continue;
            }
            debug!(package = %name, "recording manifest");
            self.writer.write(manifest)?;
            written.push(manifest.path().to_path_buf());
        }

        if plan.mode == ReleaseMode::Fixed {
            if let Some(version) = &plan.repo_version {
                self.writer.write_root_version(root_record, version)?;
                written.push(root_record.to_path_buf());
            }
        }

        info!(files = written.len(), "recorded release");
        Ok(written)
    }
}
