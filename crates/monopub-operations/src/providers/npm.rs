use std::path::Path;
use std::process::{Command, Output};

use monopub_core::PackageInfo;
use tracing::debug;

use crate::Result;
use crate::error::{OperationError, RegistryAction};
use crate::traits::RegistryClient;
use crate::types::PublishTarget;

const DEFAULT_PROGRAM: &str = "npm";

/// Drives the registry through the `npm` command line client.
pub struct NpmRegistryClient {
    program: String,
}

impl NpmRegistryClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
        }
    }

    /// Uses another npm-compatible client binary.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn run(&self, dir: &Path, args: &[&str]) -> Result<Output> {
        debug!(program = %self.program, ?args, dir = %dir.display(), "running registry command");
        Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|source| OperationError::Spawn {
                program: self.program.clone(),
                source,
            })
    }

    fn run_registry(
        &self,
        target: &PublishTarget,
        action: RegistryAction,
        args: &[&str],
    ) -> Result<Output> {
        let mut full_args: Vec<&str> = args.to_vec();
        if let Some(registry) = target.registry.as_deref() {
            full_args.extend(["--registry", registry]);
        }

        let output = self.run(&target.directory, &full_args)?;
        if output.status.success() {
            Ok(output)
        } else {
            Err(OperationError::Registry {
                package: target.package.clone(),
                action,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl Default for NpmRegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryClient for NpmRegistryClient {
    fn publish(&self, target: &PublishTarget, dist_tag: &str) -> Result<()> {
        self.run_registry(
            target,
            RegistryAction::Publish,
            &["publish", "--tag", dist_tag],
        )?;
        Ok(())
    }

    fn dist_tag_exists(&self, target: &PublishTarget, dist_tag: &str) -> Result<bool> {
        let output = self.run_registry(
            target,
            RegistryAction::ListDistTags,
            &["dist-tag", "ls", &target.package],
        )?;
        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(parse_dist_tags(&listing).any(|tag| tag == dist_tag))
    }

    fn remove_dist_tag(&self, target: &PublishTarget, dist_tag: &str) -> Result<()> {
        self.run_registry(
            target,
            RegistryAction::RemoveDistTag,
            &["dist-tag", "rm", &target.package, dist_tag],
        )?;
        Ok(())
    }

    fn add_dist_tag(&self, target: &PublishTarget, dist_tag: &str) -> Result<()> {
        let spec = target.spec();
        self.run_registry(
            target,
            RegistryAction::AddDistTag,
            &["dist-tag", "add", &spec, dist_tag],
        )?;
        Ok(())
    }

    fn run_lifecycle_script(&self, package: &PackageInfo, script: &str) -> Result<()> {
        let output = self.run(&package.directory, &["run", script])?;
        if output.status.success() {
            Ok(())
        } else {
            debug!(
                package = %package.name,
                script,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "lifecycle script failed"
            );
            Err(OperationError::LifecycleScript {
                package: package.name.clone(),
                script: script.to_string(),
                code: output.status.code(),
            })
        }
    }
}

/// Tag names from `npm dist-tag ls` output (`latest: 1.0.0` per line).
fn parse_dist_tags(listing: &str) -> impl Iterator<Item = &str> {
    listing
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(tag, _)| tag.trim())
}
