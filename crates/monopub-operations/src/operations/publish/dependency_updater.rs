use indexmap::IndexMap;
use monopub_core::DependencyKind;
use monopub_manifest::PackageManifest;
use monopub_project::PackageGraph;
use monopub_version::{RangeStyle, format_range, satisfies};
use semver::Version;
use tracing::{debug, info};

use crate::types::{RangeUpdate, ReleasePlan};

const WORKSPACE_PROTOCOL: &str = "workspace:";

/// Rewrites released packages' own versions and the ranges other workspace
/// packages declare on them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyGraphUpdater {
    style: RangeStyle,
}

impl DependencyGraphUpdater {
    #[must_use]
    pub fn new(exact: bool) -> Self {
        let style = if exact {
            RangeStyle::Exact
        } else {
            RangeStyle::Caret
        };
        Self { style }
    }

    /// Mutates `manifests` (keyed by package name) in memory. Prior versions
    /// come from `graph`, so running this twice changes nothing the second time.
    pub fn apply(
        &self,
        plan: &ReleasePlan,
        graph: &PackageGraph,
        manifests: &mut IndexMap<String, PackageManifest>,
    ) -> Vec<RangeUpdate> {
        let mut updates = Vec::new();

        for (name, next) in &plan.versions {
            if let Some(manifest) = manifests.get_mut(name) {
                manifest.set_version(next);
            }

            let Some(prior) = graph.get(name).map(|p| &p.version) else {
                continue;
            };

            for (dependent, manifest) in manifests.iter_mut() {
                if dependent == name {
                    continue;
                }
                for kind in DependencyKind::PROPAGATING {
                    if let Some(update) = self.rewrite(manifest, dependent, name, kind, prior, next)
                    {
                        updates.push(update);
                    }
                }
            }
        }

        info!(count = updates.len(), "updated dependency ranges");
        updates
    }

    fn rewrite(
        &self,
        manifest: &mut PackageManifest,
        dependent: &str,
        dependency: &str,
        kind: DependencyKind,
        prior: &Version,
        next: &Version,
    ) -> Option<RangeUpdate> {
        let old_range = manifest.range(kind, dependency)?.to_string();

        if !satisfies(&old_range, prior) {
            debug!(dependent, dependency, range = %old_range, %prior, "range does not match prior version, leaving it");
            return None;
        }

        let new_range = self.next_range(&old_range, next)?;
        if new_range == old_range {
            return None;
        }

        manifest.set_range(kind, dependency, &new_range);
        debug!(dependent, dependency, from = %old_range, to = %new_range, "rewrote range");

        Some(RangeUpdate {
            dependent: dependent.to_string(),
            dependency: dependency.to_string(),
            kind,
            old_range,
            new_range,
        })
    }

    /// `None` for workspace aliases (`workspace:*`, `workspace:^`, `workspace:~`),
    /// which the package manager resolves at publish time.
    fn next_range(&self, old_range: &str, next: &Version) -> Option<String> {
        match old_range.trim().strip_prefix(WORKSPACE_PROTOCOL) {
            Some("*" | "^" | "~") => None,
            Some(_) => Some(format!(
                "{WORKSPACE_PROTOCOL}{}",
                format_range(next, self.style)
            )),
            None => Some(format_range(next, self.style)),
        }
    }
}
